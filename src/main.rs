use clap::Parser;
use tracing_subscriber::EnvFilter;

use vdj_assess::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("vdj_assess=debug,info")
    } else {
        EnvFilter::new("vdj_assess=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Lookup(args) => {
            cli::lookup::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Concordance(args) => {
            cli::concordance::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Extensions(args) => {
            cli::extensions::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::ExtensionSummary(args) => {
            cli::summary::run_extensions(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Overlaps(args) => {
            cli::overlaps::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::OverlapSummary(args) => {
            cli::summary::run_overlaps(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
