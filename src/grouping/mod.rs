//! Strategies for deciding which library a readgroup belongs to.
//!
//! The filename grammar only yields a readgroup (e.g. `ABCD1_L1`). The owning
//! library (`ABCD1`) comes from a naming convention that differs between
//! sequencing cores, so it is pluggable:
//!
//! | Strategy | `ABCD1_L1` | `ABCD1_rep2_L003` | `sampleA` |
//! |----------|------------|-------------------|-----------|
//! | [`LaneSuffix`] (default) | `ABCD1` | `ABCD1_rep2` | `sampleA` |
//! | [`LastUnderscore`] | `ABCD1` | `ABCD1_rep2` | `sampleA` |
//! | [`WholeReadgroup`] | `ABCD1_L1` | `ABCD1_rep2_L003` | `sampleA` |
//! | [`PatternGrouping`] | first capture group of a user regex | | |
//!
//! [`LaneSuffix`] and [`LastUnderscore`] differ on readgroups such as
//! `ABCD1_rep2`, which the former keeps whole and the latter splits.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupingError {
    #[error("Invalid library pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Library pattern '{0}' has no capture group; use (?P<library>...) or (...)")]
    MissingCaptureGroup(String),
}

/// Maps a readgroup identifier to the library that owns it
pub trait LibraryGrouping {
    /// Library identifier for `readgroup`; never empty for a non-empty readgroup
    fn library_for(&self, readgroup: &str) -> String;

    /// Short human-readable name used in log messages
    fn describe(&self) -> String;
}

/// Strip one trailing lane token `_L<digits>` (`_L1`, `_L001`).
/// Readgroups without a lane token are their own library.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneSuffix;

impl LibraryGrouping for LaneSuffix {
    fn library_for(&self, readgroup: &str) -> String {
        if let Some(idx) = readgroup.rfind("_L") {
            let lane = &readgroup[idx + 2..];
            if idx > 0 && !lane.is_empty() && lane.bytes().all(|b| b.is_ascii_digit()) {
                return readgroup[..idx].to_string();
            }
        }
        readgroup.to_string()
    }

    fn describe(&self) -> String {
        "lane suffix (_L<n>)".to_string()
    }
}

/// Split at the last underscore; readgroups without one are their own library
#[derive(Debug, Clone, Copy, Default)]
pub struct LastUnderscore;

impl LibraryGrouping for LastUnderscore {
    fn library_for(&self, readgroup: &str) -> String {
        match readgroup.rfind('_') {
            Some(idx) if idx > 0 => readgroup[..idx].to_string(),
            _ => readgroup.to_string(),
        }
    }

    fn describe(&self) -> String {
        "last underscore".to_string()
    }
}

/// Every readgroup is a library of its own
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeReadgroup;

impl LibraryGrouping for WholeReadgroup {
    fn library_for(&self, readgroup: &str) -> String {
        readgroup.to_string()
    }

    fn describe(&self) -> String {
        "readgroup".to_string()
    }
}

/// Library taken from a user regex: the `library` named group if present,
/// else group 1. Readgroups that do not match, or whose capture is empty,
/// are their own library.
#[derive(Debug, Clone)]
pub struct PatternGrouping {
    regex: Regex,
}

impl PatternGrouping {
    /// # Errors
    ///
    /// Returns `GroupingError::InvalidPattern` if `pattern` does not compile, or
    /// `GroupingError::MissingCaptureGroup` if it captures nothing.
    pub fn new(pattern: &str) -> Result<Self, GroupingError> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(GroupingError::MissingCaptureGroup(pattern.to_string()));
        }
        Ok(Self { regex })
    }
}

impl LibraryGrouping for PatternGrouping {
    fn library_for(&self, readgroup: &str) -> String {
        self.regex
            .captures(readgroup)
            .and_then(|caps| caps.name("library").or_else(|| caps.get(1)))
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(readgroup)
            .to_string()
    }

    fn describe(&self) -> String {
        format!("pattern /{}/", self.regex.as_str())
    }
}

impl<F> LibraryGrouping for F
where
    F: Fn(&str) -> String,
{
    fn library_for(&self, readgroup: &str) -> String {
        self(readgroup)
    }

    fn describe(&self) -> String {
        "custom".to_string()
    }
}
