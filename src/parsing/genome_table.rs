use std::collections::BTreeMap;
use std::path::Path;

use crate::parsing::fastq_name::ParseError;
use crate::utils::validation::check_entry_limit;

/// Library name -> genome string
pub type GenomeTable = BTreeMap<String, String>;

/// Load a library -> genome table, choosing the format from the extension:
/// `.yaml`/`.yml` mapping, `.json` object, `.csv`, otherwise tab-separated.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if the content is invalid.
pub fn parse_genome_table_file(path: &Path) -> Result<GenomeTable, ParseError> {
    let content = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("yaml" | "yml") => parse_genome_table_yaml(&content),
        Some("json") => parse_genome_table_json(&content),
        Some("csv") => parse_genome_table_text(&content, ','),
        _ => parse_genome_table_text(&content, '\t'),
    }
}

/// Parse a YAML mapping such as `ABCD1: hg19`
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the document is not a string -> string mapping.
pub fn parse_genome_table_yaml(text: &str) -> Result<GenomeTable, ParseError> {
    if text.trim().is_empty() {
        return Ok(GenomeTable::new());
    }
    serde_yaml::from_str(text)
        .map_err(|e| ParseError::InvalidFormat(format!("Invalid genome table YAML: {e}")))
}

/// Parse a JSON object such as `{"ABCD1": "hg19"}`
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the document is not a string -> string object.
pub fn parse_genome_table_json(text: &str) -> Result<GenomeTable, ParseError> {
    serde_json::from_str(text)
        .map_err(|e| ParseError::InvalidFormat(format!("Invalid genome table JSON: {e}")))
}

/// Parse delimited text with columns: library, genome
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 2 fields, an
/// empty library name, or repeats a library, or `ParseError::TooManyEntries`
/// if the limit is exceeded.
pub fn parse_genome_table_text(text: &str, delimiter: char) -> Result<GenomeTable, ParseError> {
    let mut table = GenomeTable::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        // Check if first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "library" || first == "sample" || first == "name" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let library = fields[0];
        if library.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Empty library name on line {line_num}"
            )));
        }

        if check_entry_limit(table.len()).is_some() {
            return Err(ParseError::TooManyEntries(table.len()));
        }

        if table
            .insert(library.to_string(), fields[1].to_string())
            .is_some()
        {
            return Err(ParseError::InvalidFormat(format!(
                "Library '{library}' listed more than once (line {line_num})"
            )));
        }
    }

    Ok(table)
}
