//! Centralized validation and helper functions.

use crate::parsing::fastq_name::ParseError;

/// Maximum number of input paths or table rows accepted in one run
pub const MAX_INPUT_FILES: usize = 1_000_000;

/// Check if adding another entry would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new entry.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_entry_limit(count: usize) -> Option<String> {
    if count >= MAX_INPUT_FILES {
        Some(format!(
            "Too many entries: adding another would exceed maximum of {MAX_INPUT_FILES}"
        ))
    } else {
        None
    }
}

/// Reject input paths that cannot name a FASTQ file.
///
/// Empty (or whitespace-only) paths and paths containing NUL or other control
/// characters are refused. Everything else is passed through untouched; the
/// path is never rewritten because it is copied verbatim into the output.
///
/// # Errors
///
/// Returns `ParseError::InvalidPath` describing the problem.
pub fn validate_input_path(path: &str) -> Result<(), ParseError> {
    if path.trim().is_empty() {
        return Err(ParseError::InvalidPath {
            path: path.to_string(),
            reason: "empty path".to_string(),
        });
    }

    if path.chars().any(char::is_control) {
        return Err(ParseError::InvalidPath {
            path: path.escape_debug().to_string(),
            reason: "contains control characters".to_string(),
        });
    }

    Ok(())
}
