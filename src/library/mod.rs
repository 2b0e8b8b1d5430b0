//! Building and rendering experiment configurations.
//!
//! - [`builder`]: folds FASTQ paths into a [`LibraryConfig`](crate::core::LibraryConfig)
//! - [`render`]: writes a configuration as block YAML (or JSON)
//!
//! Parsing, grouping and rendering are independent stages: the builder takes
//! any [`LibraryGrouping`](crate::grouping::LibraryGrouping), and the renderer
//! only sees the finished configuration.

pub mod builder;
pub mod render;

pub use builder::{build, BuildError, BuildErrors, GenomeAssignment, LibraryBuilder};
pub use render::{render, write_config, ConfigFormat, RenderError};
