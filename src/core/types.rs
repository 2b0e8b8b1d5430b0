use serde::{Deserialize, Serialize};

/// Which end of a paired-end read pair a FASTQ file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mate {
    /// Read 1, filename digit `1`
    First,
    /// Read 2, filename digit `2`
    Second,
}

impl Mate {
    /// Map a filename mate digit to a mate. Only `1` and `2` are valid.
    #[must_use]
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::First),
            '2' => Some(Self::Second),
            _ => None,
        }
    }

    /// The opposite mate of the pair
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    #[must_use]
    pub fn digit(self) -> char {
        match self {
            Self::First => '1',
            Self::Second => '2',
        }
    }
}

impl std::fmt::Display for Mate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// A FASTQ path broken down by the naming convention
/// `<readgroup>.<1|2>.(fastq|fq)[suffix]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastqName {
    /// Captured filename prefix; identifies the readgroup
    pub readgroup: String,

    /// Mate indicated by the digit before the extension
    pub mate: Mate,

    /// Anything after `fastq`/`fq`, usually a compression extension such as `.gz`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,

    /// The path exactly as supplied
    pub path: String,
}

impl FastqName {
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !self.suffix.is_empty()
    }
}
