use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::Mate;

/// The two mate files of one readgroup.
///
/// Slots are filled independently so that files may arrive in any order; the
/// rendered pair is always (first, second).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readgroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
}

impl Readgroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path currently held for `mate`, if any
    #[must_use]
    pub fn slot(&self, mate: Mate) -> Option<&str> {
        match mate {
            Mate::First => self.first.as_deref(),
            Mate::Second => self.second.as_deref(),
        }
    }

    /// Place `path` in the slot for `mate`.
    ///
    /// # Errors
    ///
    /// Returns the path already occupying the slot; the readgroup is left unchanged.
    pub fn insert(&mut self, mate: Mate, path: impl Into<String>) -> Result<(), String> {
        let slot = match mate {
            Mate::First => &mut self.first,
            Mate::Second => &mut self.second,
        };
        if let Some(existing) = slot {
            return Err(existing.clone());
        }
        *slot = Some(path.into());
        Ok(())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// Mates that have not been seen yet
    #[must_use]
    pub fn missing(&self) -> Vec<Mate> {
        [Mate::First, Mate::Second]
            .into_iter()
            .filter(|mate| self.slot(*mate).is_none())
            .collect()
    }

    /// The ordered (first, second) pair, when both mates are present
    #[must_use]
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.first, &self.second) {
            (Some(first), Some(second)) => Some((first.as_str(), second.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        usize::from(self.first.is_some()) + usize::from(self.second.is_some())
    }
}

/// A sequencing library: its genome and its readgroups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Reference genome, supplied externally. `None` renders as an empty string.
    #[serde(default)]
    pub genome: Option<String>,

    pub readgroups: BTreeMap<String, Readgroup>,
}

impl Library {
    #[must_use]
    pub fn new(genome: Option<String>) -> Self {
        Self {
            genome,
            readgroups: BTreeMap::new(),
        }
    }

    /// Genome string as written to the configuration
    #[must_use]
    pub fn genome_or_empty(&self) -> &str {
        self.genome.as_deref().unwrap_or("")
    }
}

/// Root of the experiment configuration: library name -> library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryConfig {
    pub libraries: BTreeMap<String, Library>,
}

impl LibraryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    #[must_use]
    pub fn get(&self, library: &str) -> Option<&Library> {
        self.libraries.get(library)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Library)> {
        self.libraries.iter()
    }

    #[must_use]
    pub fn readgroup_count(&self) -> usize {
        self.libraries.values().map(|l| l.readgroups.len()).sum()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.libraries
            .values()
            .flat_map(|l| l.readgroups.values())
            .map(Readgroup::file_count)
            .sum()
    }
}
