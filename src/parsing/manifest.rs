use std::io::Read;
use std::path::Path;

use crate::parsing::fastq_name::ParseError;
use crate::utils::validation::check_entry_limit;

/// Read a manifest of FASTQ paths, one per line. `-` reads from stdin.
///
/// # Errors
///
/// Returns `ParseError::Io` if the manifest cannot be read, or
/// `ParseError::TooManyEntries` if it lists too many paths.
pub fn parse_manifest_file(path: &Path) -> Result<Vec<String>, ParseError> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_manifest_text(&content)
}

/// Parse manifest text. Blank lines and `#` comments are skipped; surrounding
/// whitespace is trimmed.
///
/// # Errors
///
/// Returns `ParseError::TooManyEntries` if the limit is exceeded.
pub fn parse_manifest_text(text: &str) -> Result<Vec<String>, ParseError> {
    let mut paths = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if check_entry_limit(paths.len()).is_some() {
            return Err(ParseError::TooManyEntries(paths.len()));
        }

        paths.push(line.to_string());
    }

    Ok(paths)
}
