use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::types::{FastqName, Mate};
use crate::utils::validation::validate_input_path;

/// Filename grammar, matched against the base name only.
///
/// - `readgroup`: shortest non-empty prefix for which the rest matches
/// - `mate`: the single digit `1` or `2`
/// - `suffix`: whatever follows `fastq`/`fq`, e.g. `.gz`
pub const FASTQ_NAME_PATTERN: &str =
    r"^(?P<readgroup>.+?)\.(?P<mate>[12])\.(?:fastq|fq)(?P<suffix>.*)$";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: does not match <readgroup>.<1|2>.(fastq|fq)[.ext]: {reason}")]
    PatternMismatch { path: String, reason: String },

    #[error("{path}: invalid path: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many entries: {0} exceeds maximum allowed (1000000)")]
    TooManyEntries(usize),
}

impl ParseError {
    /// The input path an error refers to, when it refers to one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::PatternMismatch { path, .. } | Self::InvalidPath { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn fastq_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FASTQ_NAME_PATTERN).expect("FASTQ name grammar is valid"))
}

/// Parse a FASTQ path into readgroup, mate and suffix.
///
/// Directory components are ignored for matching; the returned
/// [`FastqName::path`] keeps the path exactly as given.
///
/// # Examples
///
/// ```
/// use library_config::core::Mate;
/// use library_config::parsing::fastq_name::parse_fastq_name;
///
/// let name = parse_fastq_name("runs/ABCD1_L1.2.fastq.gz").unwrap();
/// assert_eq!(name.readgroup, "ABCD1_L1");
/// assert_eq!(name.mate, Mate::Second);
/// assert_eq!(name.suffix, ".gz");
/// assert_eq!(name.path, "runs/ABCD1_L1.2.fastq.gz");
/// ```
///
/// # Errors
///
/// Returns `ParseError::InvalidPath` for empty paths or paths with control
/// characters, and `ParseError::PatternMismatch` when the base filename does
/// not follow the convention.
pub fn parse_fastq_name(path: &str) -> Result<FastqName, ParseError> {
    validate_input_path(path)?;

    let base = base_name(path).ok_or_else(|| ParseError::PatternMismatch {
        path: path.to_string(),
        reason: "path has no file name".to_string(),
    })?;

    let caps = fastq_name_regex()
        .captures(base)
        .ok_or_else(|| ParseError::PatternMismatch {
            path: path.to_string(),
            reason: mismatch_reason(base).to_string(),
        })?;

    // The grammar only admits [12] here
    let mate = caps["mate"]
        .chars()
        .next()
        .and_then(Mate::from_digit)
        .ok_or_else(|| ParseError::PatternMismatch {
            path: path.to_string(),
            reason: "mate digit must be 1 or 2".to_string(),
        })?;

    Ok(FastqName {
        readgroup: caps["readgroup"].to_string(),
        mate,
        suffix: caps["suffix"].to_string(),
        path: path.to_string(),
    })
}

fn base_name(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|n| n.to_str())
}

/// Best-effort explanation of why `base` failed the grammar
fn mismatch_reason(base: &str) -> &'static str {
    if !base.contains(".fastq") && !base.contains(".fq") {
        "missing .fastq or .fq extension"
    } else if !base.contains(".1.fastq")
        && !base.contains(".1.fq")
        && !base.contains(".2.fastq")
        && !base.contains(".2.fq")
    {
        "missing mate digit (.1. or .2.) before the extension"
    } else {
        "empty readgroup prefix"
    }
}
