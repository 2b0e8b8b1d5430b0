//! Parsers for the tool's inputs.
//!
//! - **FASTQ filenames**: the naming convention that yields readgroup and mate
//! - **Manifests**: plain-text lists of FASTQ paths, one per line
//! - **Genome tables**: library -> genome assignments (TSV, CSV, YAML or JSON)
//!
//! ## Filename Grammar
//!
//! ```text
//! <readgroup>.<mate>.(fastq|fq)[suffix]
//! ```
//!
//! | Part | Rule |
//! |------|------|
//! | readgroup | shortest non-empty prefix that lets the rest match |
//! | mate | `1` (first) or `2` (second) |
//! | suffix | anything, typically `.gz` |
//!
//! Only the base filename is matched; directories are ignored.

pub mod fastq_name;
pub mod genome_table;
pub mod manifest;
