use clap::Parser;
use library_config::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag; stdout is reserved for the configuration
    let filter = if cli.verbose {
        EnvFilter::new("library_config=debug,info")
    } else {
        EnvFilter::new("library_config=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    cli::run(cli)
}
