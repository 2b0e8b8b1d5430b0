//! # library-config
//!
//! Infer a sequencing experiment configuration from FASTQ filenames.
//!
//! Pipelines such as ATAC-seq workflows want a configuration listing, for each
//! library, its reference genome and the paired-end FASTQ files of each
//! readgroup (lane). When files follow a naming convention like
//! `ABCD1_L1.1.fastq.gz`, that configuration can be derived from the filenames
//! alone:
//!
//! ```text
//! ABCD1:
//!     genome: hg19
//!     readgroups:
//!         ABCD1_L1:
//!             - ABCD1_L1.1.fastq.gz
//!             - ABCD1_L1.2.fastq.gz
//! ```
//!
//! ## Example
//!
//! ```rust
//! use library_config::grouping::LaneSuffix;
//! use library_config::library::{build, render, ConfigFormat, GenomeAssignment};
//!
//! let files = [
//!     "ABCD1_L1.1.fastq.gz",
//!     "ABCD1_L1.2.fastq.gz",
//!     "ABCD1_L2.1.fastq.gz",
//!     "ABCD1_L2.2.fastq.gz",
//! ];
//!
//! let genomes = GenomeAssignment::new().with_default("hg19");
//! let config = build(files, &LaneSuffix, genomes).unwrap();
//! assert_eq!(config.readgroup_count(), 2);
//!
//! let yaml = render(&config, ConfigFormat::Yaml).unwrap();
//! assert!(yaml.starts_with("ABCD1:\n    genome: hg19\n"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Data types for mates, readgroups, libraries and configurations
//! - [`parsing`]: FASTQ filename grammar, manifests and genome tables
//! - [`grouping`]: Readgroup -> library strategies
//! - [`library`]: Configuration builder and renderer
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod grouping;
pub mod library;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::{FastqName, Library, LibraryConfig, Mate, Readgroup};
pub use grouping::LibraryGrouping;
pub use library::{BuildError, LibraryBuilder, RenderError};
pub use parsing::fastq_name::{parse_fastq_name, ParseError};
