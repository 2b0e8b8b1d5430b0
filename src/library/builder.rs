use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::library::{Library, LibraryConfig, Readgroup};
use crate::core::types::Mate;
use crate::grouping::LibraryGrouping;
use crate::parsing::fastq_name::{parse_fastq_name, ParseError};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(
        "{path}: duplicate {mate} mate for readgroup '{readgroup}' in library '{library}' (already have '{existing}')"
    )]
    DuplicateMate {
        library: String,
        readgroup: String,
        mate: Mate,
        existing: String,
        path: String,
    },

    #[error("{path}: missing {missing} mate for readgroup '{readgroup}' in library '{library}'")]
    UnpairedMate {
        library: String,
        readgroup: String,
        missing: Mate,
        path: String,
    },
}

impl BuildError {
    /// The input path the error refers to, when it refers to one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Parse(e) => e.path(),
            Self::DuplicateMate { path, .. } | Self::UnpairedMate { path, .. } => Some(path),
        }
    }

    #[must_use]
    pub fn is_pattern_mismatch(&self) -> bool {
        matches!(self, Self::Parse(ParseError::PatternMismatch { .. }))
    }
}

/// Every problem found in one pass over the input paths
#[derive(Error, Debug)]
#[error("{} of {total} input file(s) rejected", .errors.len())]
pub struct BuildErrors {
    pub errors: Vec<BuildError>,
    pub total: usize,
}

impl BuildErrors {
    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.errors.iter()
    }
}

/// Genome assignment for libraries.
///
/// A per-library entry wins over the default; with neither the genome is left unset.
#[derive(Debug, Clone, Default)]
pub struct GenomeAssignment {
    pub default: Option<String>,
    pub per_library: BTreeMap<String, String>,
}

impl GenomeAssignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default(mut self, genome: impl Into<String>) -> Self {
        self.default = Some(genome.into());
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: BTreeMap<String, String>) -> Self {
        self.per_library.extend(table);
        self
    }

    #[must_use]
    pub fn genome_for(&self, library: &str) -> Option<String> {
        self.per_library
            .get(library)
            .or(self.default.as_ref())
            .cloned()
    }
}

/// Accumulates FASTQ paths into a [`LibraryConfig`].
///
/// The builder owns the configuration under construction; [`finish`](Self::finish)
/// hands it back by value.
///
/// ```
/// use library_config::grouping::LaneSuffix;
/// use library_config::library::builder::LibraryBuilder;
///
/// let mut builder = LibraryBuilder::new(&LaneSuffix);
/// builder
///     .add_paths(["ABCD1_L1.1.fastq.gz", "ABCD1_L1.2.fastq.gz"])
///     .unwrap();
/// let config = builder.finish().unwrap();
///
/// let (first, second) = config.get("ABCD1").unwrap().readgroups["ABCD1_L1"]
///     .pair()
///     .unwrap();
/// assert_eq!(first, "ABCD1_L1.1.fastq.gz");
/// assert_eq!(second, "ABCD1_L1.2.fastq.gz");
/// ```
pub struct LibraryBuilder<'a> {
    grouping: &'a dyn LibraryGrouping,
    genomes: GenomeAssignment,
    config: LibraryConfig,
    seen: usize,
}

impl<'a> LibraryBuilder<'a> {
    #[must_use]
    pub fn new(grouping: &'a dyn LibraryGrouping) -> Self {
        Self {
            grouping,
            genomes: GenomeAssignment::default(),
            config: LibraryConfig::new(),
            seen: 0,
        }
    }

    #[must_use]
    pub fn with_genomes(mut self, genomes: GenomeAssignment) -> Self {
        self.genomes = genomes;
        self
    }

    /// Parse one path and file it under its library and readgroup.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Parse` if the filename does not follow the
    /// convention, or `BuildError::DuplicateMate` if the readgroup already has
    /// a file for that mate. On error the configuration is unchanged.
    pub fn add_path(&mut self, path: &str) -> Result<(), BuildError> {
        self.seen += 1;
        let name = parse_fastq_name(path)?;
        let library_id = self.grouping.library_for(&name.readgroup);

        debug!(
            path,
            library = %library_id,
            readgroup = %name.readgroup,
            mate = %name.mate,
            "Parsed FASTQ name"
        );

        let genomes = &self.genomes;
        let library = self
            .config
            .libraries
            .entry(library_id.clone())
            .or_insert_with(|| Library::new(genomes.genome_for(&library_id)));

        let readgroup = library
            .readgroups
            .entry(name.readgroup.clone())
            .or_insert_with(Readgroup::new);

        readgroup
            .insert(name.mate, name.path.clone())
            .map_err(|existing| BuildError::DuplicateMate {
                library: library_id,
                readgroup: name.readgroup,
                mate: name.mate,
                existing,
                path: name.path,
            })
    }

    /// Add every path, collecting all problems instead of stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns `BuildErrors` listing every rejected path, in input order.
    pub fn add_paths<I, S>(&mut self, paths: I) -> Result<(), BuildErrors>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let errors: Vec<BuildError> = paths
            .into_iter()
            .filter_map(|path| self.add_path(path.as_ref()).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BuildErrors {
                errors,
                total: self.seen,
            })
        }
    }

    /// The configuration built so far
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Every readgroup still missing a mate, sorted by library and readgroup
    #[must_use]
    pub fn unpaired(&self) -> Vec<BuildError> {
        let mut errors = Vec::new();
        for (library_id, library) in self.config.iter() {
            for (rg_name, readgroup) in &library.readgroups {
                for missing in readgroup.missing() {
                    let Some(path) = readgroup.slot(missing.other()) else {
                        continue;
                    };
                    errors.push(BuildError::UnpairedMate {
                        library: library_id.clone(),
                        readgroup: rg_name.clone(),
                        missing,
                        path: path.to_string(),
                    });
                }
            }
        }
        errors
    }

    /// Hand back the finished configuration.
    ///
    /// # Errors
    ///
    /// Returns `BuildErrors` with one `BuildError::UnpairedMate` per readgroup
    /// that has only one of its two mates.
    pub fn finish(self) -> Result<LibraryConfig, BuildErrors> {
        let errors = self.unpaired();
        if !errors.is_empty() {
            return Err(BuildErrors {
                errors,
                total: self.seen,
            });
        }

        for library in self.genomes.per_library.keys() {
            if !self.config.libraries.contains_key(library) {
                warn!("Genome table entry '{library}' matches no library");
            }
        }
        Ok(self.config)
    }
}

/// Build a configuration from `paths` in one call.
///
/// # Errors
///
/// Returns `BuildErrors` if any path is rejected or any readgroup lacks a mate;
/// every problem is listed and no partial configuration is returned.
pub fn build<I, S>(
    paths: I,
    grouping: &dyn LibraryGrouping,
    genomes: GenomeAssignment,
) -> Result<LibraryConfig, BuildErrors>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = LibraryBuilder::new(grouping).with_genomes(genomes);
    let mut errors = match builder.add_paths(paths) {
        Ok(()) => Vec::new(),
        Err(rejected) => rejected.errors,
    };
    errors.extend(builder.unpaired());

    if errors.is_empty() {
        builder.finish()
    } else {
        Err(BuildErrors {
            errors,
            total: builder.seen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::{LaneSuffix, WholeReadgroup};

    const ABCD1: [&str; 4] = [
        "ABCD1_L1.1.fastq.gz",
        "ABCD1_L1.2.fastq.gz",
        "ABCD1_L2.1.fastq.gz",
        "ABCD1_L2.2.fastq.gz",
    ];

    #[test]
    fn test_build_groups_lanes_into_library() {
        let config = build(ABCD1, &LaneSuffix, GenomeAssignment::new()).unwrap();

        assert_eq!(config.len(), 1);
        let library = config.get("ABCD1").unwrap();
        assert_eq!(library.genome, None);
        assert_eq!(library.readgroups.len(), 2);
        assert_eq!(
            library.readgroups["ABCD1_L2"].pair(),
            Some(("ABCD1_L2.1.fastq.gz", "ABCD1_L2.2.fastq.gz"))
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let reversed: Vec<&str> = ABCD1.iter().rev().copied().collect();
        let a = build(ABCD1, &LaneSuffix, GenomeAssignment::new()).unwrap();
        let b = build(reversed, &LaneSuffix, GenomeAssignment::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_one_readgroup_per_prefix() {
        let config = build(ABCD1, &WholeReadgroup, GenomeAssignment::new()).unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.readgroup_count(), 2);
        assert_eq!(config.file_count(), 4);
        for (name, library) in config.iter() {
            assert_eq!(library.readgroups.len(), 1);
            assert!(library.readgroups[name].is_complete());
        }
    }

    #[test]
    fn test_duplicate_mate_is_rejected() {
        let mut builder = LibraryBuilder::new(&LaneSuffix);
        builder.add_path("run1/ABCD1_L1.1.fastq.gz").unwrap();

        let err = builder.add_path("run2/ABCD1_L1.1.fq").unwrap_err();
        match &err {
            BuildError::DuplicateMate {
                library,
                readgroup,
                mate,
                existing,
                path,
            } => {
                assert_eq!(library, "ABCD1");
                assert_eq!(readgroup, "ABCD1_L1");
                assert_eq!(*mate, Mate::First);
                assert_eq!(existing, "run1/ABCD1_L1.1.fastq.gz");
                assert_eq!(path, "run2/ABCD1_L1.1.fq");
            }
            other => panic!("expected DuplicateMate, got {other:?}"),
        }
        assert_eq!(err.path(), Some("run2/ABCD1_L1.1.fq"));

        // The first file is kept
        assert_eq!(
            builder.config().get("ABCD1").unwrap().readgroups["ABCD1_L1"].slot(Mate::First),
            Some("run1/ABCD1_L1.1.fastq.gz")
        );
    }

    #[test]
    fn test_all_errors_are_collected() {
        let paths = [
            "ABCD1_L1.1.fastq.gz",
            "notes.txt",
            "ABCD1_L1.1.fastq.gz",
            "README",
            "ABCD1_L1.2.fastq.gz",
        ];
        let err = build(paths, &LaneSuffix, GenomeAssignment::new()).unwrap_err();

        assert_eq!(err.total, 5);
        assert_eq!(err.errors.len(), 3);
        assert!(err.errors[0].is_pattern_mismatch());
        assert_eq!(err.errors[0].path(), Some("notes.txt"));
        assert!(matches!(err.errors[1], BuildError::DuplicateMate { .. }));
        assert_eq!(err.errors[2].path(), Some("README"));
        assert_eq!(err.to_string(), "3 of 5 input file(s) rejected");
    }

    #[test]
    fn test_every_unpaired_readgroup_is_reported() {
        let err = build(
            ["A_L1.1.fq", "B_L1.2.fq", "C_L1.1.fq", "C_L1.2.fq"],
            &LaneSuffix,
            GenomeAssignment::new(),
        )
        .unwrap_err();

        assert_eq!(err.total, 4);
        assert_eq!(err.errors.len(), 2);
        match &err.errors[0] {
            BuildError::UnpairedMate {
                library,
                readgroup,
                missing,
                path,
            } => {
                assert_eq!(library, "A");
                assert_eq!(readgroup, "A_L1");
                assert_eq!(*missing, Mate::Second);
                assert_eq!(path, "A_L1.1.fq");
            }
            other => panic!("expected UnpairedMate, got {other:?}"),
        }
        assert_eq!(
            err.errors[1].to_string(),
            "B_L1.2.fq: missing first mate for readgroup 'B_L1' in library 'B'"
        );
    }

    #[test]
    fn test_unpaired_reported_alongside_parse_errors() {
        let err = build(
            ["notes.txt", "A_L1.1.fq"],
            &LaneSuffix,
            GenomeAssignment::new(),
        )
        .unwrap_err();

        assert_eq!(err.errors.len(), 2);
        assert!(err.errors[0].is_pattern_mismatch());
        assert_eq!(err.errors[1].path(), Some("A_L1.1.fq"));
        assert_eq!(err.to_string(), "2 of 2 input file(s) rejected");
    }

    #[test]
    fn test_finish_rejects_unpaired() {
        let mut builder = LibraryBuilder::new(&LaneSuffix);
        builder.add_path("A_L1.2.fq").unwrap();
        assert_eq!(builder.unpaired().len(), 1);

        let err = builder.finish().unwrap_err();
        assert_eq!(err.total, 1);
        assert!(matches!(
            err.errors[0],
            BuildError::UnpairedMate {
                missing: Mate::First,
                ..
            }
        ));
    }

    #[test]
    fn test_genome_assignment() {
        let table = BTreeMap::from([("ABCD1".to_string(), "hg19".to_string())]);
        let genomes = GenomeAssignment::new().with_default("hg38").with_table(table);

        let paths = ["ABCD1_L1.1.fq", "ABCD1_L1.2.fq", "EFGH2.1.fq", "EFGH2.2.fq"];
        let config = build(paths, &LaneSuffix, genomes).unwrap();

        assert_eq!(config.get("ABCD1").unwrap().genome.as_deref(), Some("hg19"));
        assert_eq!(config.get("EFGH2").unwrap().genome.as_deref(), Some("hg38"));
    }

    #[test]
    fn test_genome_assignment_lookup() {
        let genomes = GenomeAssignment::new();
        assert_eq!(genomes.genome_for("x"), None);

        let genomes = genomes.with_default("mm10");
        assert_eq!(genomes.genome_for("x").as_deref(), Some("mm10"));
    }

    #[test]
    fn test_empty_input_builds_empty_config() {
        let config = build(Vec::<String>::new(), &LaneSuffix, GenomeAssignment::new()).unwrap();
        assert!(config.is_empty());
    }
}
