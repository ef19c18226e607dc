use std::path::PathBuf;

use clap::Args;

use crate::analysis::extensions::ExtensionReport;
use crate::analysis::overlaps::OverlapReport;
use crate::analysis::summary::{
    read_json_lines_file, ExtensionSummary, OverlapSummary, DEFAULT_MAX_CLONES,
};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct ExtensionSummaryArgs {
    /// JSON-lines file of extension reports
    #[arg(required = true)]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct OverlapSummaryArgs {
    /// JSON-lines file of overlap reports
    #[arg(required = true)]
    pub input: PathBuf,

    /// Clone count bound for the small-repertoire maxima
    #[arg(long, default_value_t = DEFAULT_MAX_CLONES)]
    pub max_clones: u64,
}

/// Execute extension-summary subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or a line is not an extension report.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_extensions(args: ExtensionSummaryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reports: Vec<ExtensionReport> = read_json_lines_file(&args.input)?;
    if verbose {
        eprintln!("Read {} runs from {}", reports.len(), args.input.display());
    }

    let summary = ExtensionSummary::from_reports(&reports);
    match format {
        OutputFormat::Text => println!("{summary}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("runs\ttotalExtensions\tfalseExtensions\tfalsePercent");
            println!(
                "{}\t{}\t{}\t{:.4}",
                summary.runs, summary.total_extensions, summary.false_extensions, summary.false_percent
            );
        }
    }

    Ok(())
}

/// Execute overlap-summary subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or a line is not an overlap report.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_overlaps(args: OverlapSummaryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reports: Vec<OverlapReport> = read_json_lines_file(&args.input)?;
    if verbose {
        eprintln!("Read {} runs from {}", reports.len(), args.input.display());
    }

    let summary = OverlapSummary::from_reports(&reports, args.max_clones);
    match format {
        OutputFormat::Text => println!("{summary}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("group\tpercentBad\tpercentBadDiversity\tpercentBadDiversityHQ");
            for (group, maxima) in [
                (format!("clones<={}", summary.max_clones), summary.small),
                ("all".to_string(), summary.all),
            ] {
                println!(
                    "{group}\t{:.3}\t{:.3}\t{:.3}",
                    maxima.percent_bad, maxima.percent_bad_diversity, maxima.percent_bad_diversity_hq
                );
            }
        }
    }

    Ok(())
}
