//! Command-line interface for make-library-config.
//!
//! ## Usage
//!
//! ```text
//! # FASTQ paths on the command line
//! make-library-config --genome hg19 fastq/*.fastq.gz > library-config.yaml
//!
//! # Paths from a manifest (or `-` for stdin), genomes from a table
//! find fastq -name '*.f*q*' | make-library-config --manifest - --genome-table genomes.tsv
//!
//! # Libraries named by a custom pattern
//! make-library-config --grouping pattern --library-pattern '^(\w+?)_rep\d+' *.fq.gz
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::grouping::{LaneSuffix, LastUnderscore, LibraryGrouping, PatternGrouping, WholeReadgroup};
use crate::library::{build, write_config, ConfigFormat, GenomeAssignment};
use crate::parsing::genome_table::parse_genome_table_file;
use crate::parsing::manifest::parse_manifest_file;

#[derive(Parser)]
#[command(name = "make-library-config")]
#[command(author = "Parker Lab")]
#[command(version)]
#[command(about = "Generate a library/readgroup/FASTQ configuration from FASTQ filenames")]
#[command(
    long_about = "Dump a YAML formatted experiment configuration generated by parsing FASTQ filenames.\n\nFiles must be named <readgroup>.<1|2>.(fastq|fq)[.ext], e.g. ABCD1_L1.1.fastq.gz. Readgroups are grouped into libraries (by default by stripping a trailing _L<n> lane token), giving:\n\nABCD1:\n    genome: hg19\n    readgroups:\n        ABCD1_L1:\n            - ABCD1_L1.1.fastq.gz\n            - ABCD1_L1.2.fastq.gz\n        ABCD1_L2:\n            - ABCD1_L2.1.fastq.gz\n            - ABCD1_L2.2.fastq.gz"
)]
pub struct Cli {
    /// FASTQ files to include
    pub fastqs: Vec<String>,

    /// File listing FASTQ paths, one per line ('-' for stdin)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Genome assigned to every library without a genome table entry
    #[arg(short, long)]
    pub genome: Option<String>,

    /// Library -> genome table (TSV, CSV, YAML or JSON)
    #[arg(long)]
    pub genome_table: Option<PathBuf>,

    /// How readgroups are grouped into libraries
    #[arg(long, value_enum, default_value = "lane")]
    pub grouping: GroupingStrategy,

    /// Regex whose `library` (or first) capture group names the library
    /// (requires --grouping pattern)
    #[arg(long, required_if_eq("grouping", "pattern"))]
    pub library_pattern: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,

    /// Write the configuration to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit an empty configuration instead of failing when no FASTQ files are given
    #[arg(long)]
    pub allow_empty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupingStrategy {
    /// Strip a trailing _L<n> lane token (ABCD1_L1 -> ABCD1)
    Lane,
    /// Split at the last underscore (ABCD1_rep2 -> ABCD1)
    LastUnderscore,
    /// Each readgroup is its own library
    Readgroup,
    /// Use --library-pattern
    Pattern,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for ConfigFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => Self::Yaml,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Build the grouping strategy selected on the command line
///
/// # Errors
///
/// Returns an error if the library pattern is invalid or given without `--grouping pattern`.
pub fn grouping_from_args(cli: &Cli) -> anyhow::Result<Box<dyn LibraryGrouping>> {
    if cli.library_pattern.is_some() && cli.grouping != GroupingStrategy::Pattern {
        anyhow::bail!("--library-pattern requires --grouping pattern");
    }

    Ok(match cli.grouping {
        GroupingStrategy::Lane => Box::new(LaneSuffix),
        GroupingStrategy::LastUnderscore => Box::new(LastUnderscore),
        GroupingStrategy::Readgroup => Box::new(WholeReadgroup),
        GroupingStrategy::Pattern => {
            let pattern = cli
                .library_pattern
                .as_deref()
                .context("--grouping pattern requires --library-pattern")?;
            Box::new(PatternGrouping::new(pattern)?)
        }
    })
}

/// Execute the command
///
/// # Errors
///
/// Returns an error if inputs cannot be read, any FASTQ path is rejected, or
/// the configuration cannot be rendered or written. Each rejected path is
/// reported on stderr before returning.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let grouping = grouping_from_args(&cli)?;

    let mut paths = cli.fastqs.clone();
    if let Some(manifest) = &cli.manifest {
        let listed = parse_manifest_file(manifest)
            .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
        debug!("Read {} path(s) from manifest {}", listed.len(), manifest.display());
        paths.extend(listed);
    }

    if paths.is_empty() && !cli.allow_empty {
        anyhow::bail!(
            "No FASTQ files given; pass paths as arguments, use --manifest, or --allow-empty"
        );
    }

    let mut genomes = GenomeAssignment::new();
    if let Some(genome) = &cli.genome {
        genomes = genomes.with_default(genome.clone());
    }
    if let Some(table_path) = &cli.genome_table {
        let table = parse_genome_table_file(table_path)
            .with_context(|| format!("Failed to read genome table {}", table_path.display()))?;
        debug!("Loaded {} genome assignment(s)", table.len());
        genomes = genomes.with_table(table);
    }

    info!(
        "Building configuration from {} file(s), grouping by {}",
        paths.len(),
        grouping.describe()
    );

    let config = match build(&paths, &*grouping, genomes) {
        Ok(config) => config,
        Err(errors) => {
            for e in errors.iter() {
                eprintln!("error: {e}");
            }
            return Err(errors.into());
        }
    };

    info!(
        "Found {} librar{}, {} readgroup(s)",
        config.len(),
        if config.len() == 1 { "y" } else { "ies" },
        config.readgroup_count()
    );

    let format = ConfigFormat::from(cli.format);
    match &cli.output {
        Some(path) => {
            // Render before creating the file so a failed run leaves nothing behind
            let text = crate::library::render(&config, format)?;
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_config(&config, format, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}
