use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::library::LibraryConfig;

/// Spaces per nesting level in YAML output
pub const YAML_INDENT: usize = 4;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Malformed configuration: library '{library}'{}: {reason}", readgroup_suffix(.readgroup.as_deref()))]
    MalformedConfig {
        library: String,
        readgroup: Option<String>,
        reason: String,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

fn readgroup_suffix(readgroup: Option<&str>) -> String {
    readgroup.map_or_else(String::new, |rg| format!(", readgroup '{rg}'"))
}

/// Text format of the rendered configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Block-style YAML, 4-space indentation
    #[default]
    Yaml,
    /// Pretty-printed JSON with the same structure
    Json,
}

/// A configuration whose every readgroup has exactly two mate files
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct Resolved<'a> {
    libraries: BTreeMap<&'a str, ResolvedLibrary<'a>>,
}

#[derive(Debug, Serialize)]
struct ResolvedLibrary<'a> {
    genome: &'a str,
    readgroups: BTreeMap<&'a str, [&'a str; 2]>,
}

fn resolve(config: &LibraryConfig) -> Result<Resolved<'_>, RenderError> {
    let mut libraries = BTreeMap::new();

    for (name, library) in config.iter() {
        if library.readgroups.is_empty() {
            return Err(RenderError::MalformedConfig {
                library: name.clone(),
                readgroup: None,
                reason: "no readgroups".to_string(),
            });
        }

        let mut readgroups = BTreeMap::new();
        for (rg_name, readgroup) in &library.readgroups {
            let (first, second) =
                readgroup
                    .pair()
                    .ok_or_else(|| RenderError::MalformedConfig {
                        library: name.clone(),
                        readgroup: Some(rg_name.clone()),
                        reason: format!(
                            "expected 2 mate files, found {} (missing {})",
                            readgroup.file_count(),
                            readgroup
                                .missing()
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join(" and ")
                        ),
                    })?;
            readgroups.insert(rg_name.as_str(), [first, second]);
        }

        libraries.insert(
            name.as_str(),
            ResolvedLibrary {
                genome: library.genome_or_empty(),
                readgroups,
            },
        );
    }

    Ok(Resolved { libraries })
}

/// Render `config` as text.
///
/// Output is deterministic: libraries and readgroups are sorted by name and
/// each readgroup lists its first mate before its second.
///
/// # Errors
///
/// Returns `RenderError::MalformedConfig` if a readgroup does not hold exactly
/// two mate files or a library has no readgroups.
pub fn render(config: &LibraryConfig, format: ConfigFormat) -> Result<String, RenderError> {
    let resolved = resolve(config)?;
    match format {
        ConfigFormat::Yaml => render_yaml(&resolved),
        ConfigFormat::Json => {
            let mut out = serde_json::to_string_pretty(&resolved)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Render `config` and write it to `writer` in a single write.
///
/// Nothing is written if rendering fails.
///
/// # Errors
///
/// Returns any rendering error, or `RenderError::Io` if the write fails.
pub fn write_config<W: Write>(
    config: &LibraryConfig,
    format: ConfigFormat,
    writer: &mut W,
) -> Result<(), RenderError> {
    let text = render(config, format)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn render_yaml(resolved: &Resolved<'_>) -> Result<String, RenderError> {
    if resolved.libraries.is_empty() {
        return Ok("{}\n".to_string());
    }

    let pad = |level: usize| " ".repeat(level * YAML_INDENT);
    let mut out = String::new();

    for (name, library) in &resolved.libraries {
        writeln!(out, "{}:", yaml_scalar(name)?)?;
        writeln!(out, "{}genome: {}", pad(1), yaml_scalar(library.genome)?)?;
        writeln!(out, "{}readgroups:", pad(1))?;
        for (rg_name, files) in &library.readgroups {
            writeln!(out, "{}{}:", pad(2), yaml_scalar(rg_name)?)?;
            for file in files {
                writeln!(out, "{}- {}", pad(3), yaml_scalar(file)?)?;
            }
        }
    }

    Ok(out)
}

/// Plain scalars that YAML 1.1 loaders (`PyYAML`) resolve to something other
/// than a string: booleans, ints, floats, timestamps, null, merge and value keys.
const YAML11_IMPLICIT_PATTERN: &str = concat!(
    r"^(?:",
    r"y|Y|yes|Yes|YES|n|N|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF",
    r"|~|null|Null|NULL|<<|=",
    r"|[-+]?0b[0-1_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+",
    r"|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+",
    r"|[-+]?(?:[0-9][0-9_]*)\.[0-9_]*(?:[eE][-+]?[0-9]+)?|\.[0-9][0-9_]*(?:[eE][-+]?[0-9]+)?",
    r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN)",
    r"|[0-9]{4}-[0-9]{2}-[0-9]{2}",
    r"|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?",
    r")$"
);

fn yaml11_implicit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(YAML11_IMPLICIT_PATTERN).expect("YAML 1.1 resolver pattern is valid")
    })
}

/// Emit a string as a single-line YAML scalar, quoted only when YAML needs it.
///
/// serde_yaml quotes by YAML 1.2 rules; plain scalars that a YAML 1.1 loader
/// would read as bool, number, date or null are single-quoted on top of that.
fn yaml_scalar(value: &str) -> Result<String, RenderError> {
    let emitted = serde_yaml::to_string(value)?;
    let emitted = emitted.trim_end_matches('\n');
    if emitted.contains('\n') {
        // Block scalars cannot sit inline; a JSON string is a valid YAML double-quoted scalar
        return Ok(serde_json::to_string(value)?);
    }
    if emitted == value && yaml11_implicit_regex().is_match(value) {
        return Ok(format!("'{}'", value.replace('\'', "''")));
    }
    Ok(emitted.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::{Library, Readgroup};
    use crate::core::types::Mate;

    fn readgroup(first: Option<&str>, second: Option<&str>) -> Readgroup {
        Readgroup {
            first: first.map(String::from),
            second: second.map(String::from),
        }
    }

    fn abcd1(genome: Option<&str>) -> LibraryConfig {
        let mut library = Library::new(genome.map(String::from));
        for lane in ["L1", "L2"] {
            let rg = format!("ABCD1_{lane}");
            let first = format!("{rg}.1.fastq.gz");
            let second = format!("{rg}.2.fastq.gz");
            library
                .readgroups
                .insert(rg, readgroup(Some(first.as_str()), Some(second.as_str())));
        }
        let mut config = LibraryConfig::new();
        config.libraries.insert("ABCD1".to_string(), library);
        config
    }

    #[test]
    fn test_render_yaml_layout() {
        let expected = "\
ABCD1:
    genome: ''
    readgroups:
        ABCD1_L1:
            - ABCD1_L1.1.fastq.gz
            - ABCD1_L1.2.fastq.gz
        ABCD1_L2:
            - ABCD1_L2.1.fastq.gz
            - ABCD1_L2.2.fastq.gz
";
        assert_eq!(render(&abcd1(None), ConfigFormat::Yaml).unwrap(), expected);
    }

    #[test]
    fn test_render_yaml_with_genome_parses_back() {
        let text = render(&abcd1(Some("hg19")), ConfigFormat::Yaml).unwrap();
        assert!(text.contains("    genome: hg19\n"));

        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["ABCD1"]["genome"].as_str(), Some("hg19"));
        let files = value["ABCD1"]["readgroups"]["ABCD1_L2"].as_sequence().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].as_str(), Some("ABCD1_L2.2.fastq.gz"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let config = abcd1(Some("mm10"));
        for format in [ConfigFormat::Yaml, ConfigFormat::Json] {
            assert_eq!(
                render(&config, format).unwrap(),
                render(&config, format).unwrap()
            );
        }
    }

    #[test]
    fn test_render_json() {
        let text = render(&abcd1(None), ConfigFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ABCD1"]["genome"], "");
        assert_eq!(
            value["ABCD1"]["readgroups"]["ABCD1_L1"],
            serde_json::json!(["ABCD1_L1.1.fastq.gz", "ABCD1_L1.2.fastq.gz"])
        );
    }

    #[test]
    fn test_yaml_scalar_quoting() {
        assert_eq!(yaml_scalar("").unwrap(), "''");
        assert_eq!(yaml_scalar("hg19").unwrap(), "hg19");
        assert_eq!(yaml_scalar("ABCD1_L1.1.fastq.gz").unwrap(), "ABCD1_L1.1.fastq.gz");

        // Strings YAML would otherwise read as other types stay strings
        for tricky in ["null", "true", "1.5", "- x", "a: b", "#c"] {
            let scalar = yaml_scalar(tricky).unwrap();
            let back: String = serde_yaml::from_str(&scalar).unwrap();
            assert_eq!(back, tricky, "scalar {scalar}");
        }

        assert_eq!(yaml_scalar("two\nlines").unwrap(), "\"two\\nlines\"");
    }

    #[test]
    fn test_yaml11_implicit_types_are_quoted() {
        let cases = [
            ("yes", "'yes'"),
            ("NO", "'NO'"),
            ("on", "'on'"),
            ("y", "'y'"),
            ("2024-01-01", "'2024-01-01'"),
            ("1_000", "'1_000'"),
            ("0x1F", "'0x1F'"),
            ("1:30", "'1:30'"),
            ("~", "'~'"),
        ];
        for (value, expected) in cases {
            let scalar = yaml_scalar(value).unwrap();
            assert_eq!(scalar, expected, "{value}");
            let back: String = serde_yaml::from_str(&scalar).unwrap();
            assert_eq!(back, value);
        }

        // Look-alikes that stay plain
        for value in ["yes_L1", "NO_L1", "2024-01-01_L1", "hg19", "1_000.1.fq.gz"] {
            assert_eq!(yaml_scalar(value).unwrap(), value);
        }
    }

    #[test]
    fn test_render_quotes_boolean_and_date_libraries() {
        let mut config = LibraryConfig::new();
        for name in ["2024-01-01", "NO"] {
            let mut library = Library::new(Some("yes".to_string()));
            let rg = format!("{name}_L1");
            let first = format!("{rg}.1.fq");
            let second = format!("{rg}.2.fq");
            library
                .readgroups
                .insert(rg, readgroup(Some(first.as_str()), Some(second.as_str())));
            config.libraries.insert(name.to_string(), library);
        }

        let text = render(&config, ConfigFormat::Yaml).unwrap();
        assert!(text.starts_with("'2024-01-01':\n    genome: 'yes'\n"));
        assert!(text.contains("\n'NO':\n    genome: 'yes'\n"));
        assert!(text.contains("        2024-01-01_L1:\n"));
    }

    #[test]
    fn test_missing_mate_is_malformed() {
        let mut config = abcd1(None);
        config
            .libraries
            .get_mut("ABCD1")
            .unwrap()
            .readgroups
            .insert("ABCD1_L3".to_string(), readgroup(Some("ABCD1_L3.1.fq"), None));

        let err = render(&config, ConfigFormat::Yaml).unwrap_err();
        match &err {
            RenderError::MalformedConfig {
                library,
                readgroup,
                reason,
            } => {
                assert_eq!(library, "ABCD1");
                assert_eq!(readgroup.as_deref(), Some("ABCD1_L3"));
                assert!(reason.contains(&Mate::Second.to_string()));
            }
            other => panic!("expected MalformedConfig, got {other:?}"),
        }
        assert!(err.to_string().contains("readgroup 'ABCD1_L3'"));
    }

    #[test]
    fn test_library_without_readgroups_is_malformed() {
        let mut config = LibraryConfig::new();
        config
            .libraries
            .insert("EMPTY".to_string(), Library::new(None));
        assert!(matches!(
            render(&config, ConfigFormat::Json),
            Err(RenderError::MalformedConfig { readgroup: None, .. })
        ));
    }

    #[test]
    fn test_write_config_writes_nothing_on_error() {
        let mut config = abcd1(None);
        config
            .libraries
            .insert("EMPTY".to_string(), Library::new(None));

        let mut out = Vec::new();
        assert!(write_config(&config, ConfigFormat::Yaml, &mut out).is_err());
        assert!(out.is_empty());

        let mut out = Vec::new();
        write_config(&abcd1(None), ConfigFormat::Yaml, &mut out).unwrap();
        assert!(out.starts_with(b"ABCD1:\n"));
    }

    #[test]
    fn test_empty_config_renders_empty() {
        assert_eq!(render(&LibraryConfig::new(), ConfigFormat::Yaml).unwrap(), "{}\n");
        assert_eq!(render(&LibraryConfig::new(), ConfigFormat::Json).unwrap(), "{}\n");
    }
}
