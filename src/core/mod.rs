//! Core data types for experiment configurations.
//!
//! - [`Mate`]: first or second read of a paired-end pair
//! - [`FastqName`]: one FASTQ path decomposed by the naming convention
//! - [`Readgroup`]: the (first, second) mate files of one lane
//! - [`Library`]: a genome plus its readgroups
//! - [`LibraryConfig`]: library name -> library, the document that gets rendered
//!
//! ## Naming Convention
//!
//! | Filename | Readgroup | Mate |
//! |----------|-----------|------|
//! | `ABCD1_L1.1.fastq.gz` | `ABCD1_L1` | first |
//! | `ABCD1_L1.2.fastq.gz` | `ABCD1_L1` | second |
//! | `atacseq.2.fq` | `atacseq` | second |
//!
//! Which library a readgroup belongs to is not part of the filename grammar;
//! see [`crate::grouping`].

pub mod library;
pub mod types;

pub use library::{Library, LibraryConfig, Readgroup};
pub use types::{FastqName, Mate};
