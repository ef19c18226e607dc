use std::path::PathBuf;

use clap::Args;

use crate::analysis::overlaps::OverlapReport;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct OverlapsArgs {
    /// Read table with readId and descrR1 columns
    #[arg(required = true)]
    pub reads: PathBuf,

    /// Overlapped alignments with targetDescriptions, nSeqCDR3 and minQualCDR3 columns
    #[arg(required = true)]
    pub overlapped: PathBuf,

    /// MiXCR assemble report
    #[arg(required = true)]
    pub report: PathBuf,
}

/// Execute overlaps subcommand
///
/// JSON output is a single line so runs can be appended to a JSON-lines file.
///
/// # Errors
///
/// Returns an error if an input cannot be read or a row is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: OverlapsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let report = OverlapReport::from_files(&args.reads, &args.overlapped, &args.report)?;

    if verbose {
        eprintln!(
            "{} of {} alignments joined to both source reads",
            report.total_overlaps, report.total_alignments
        );
    }

    let rows = [
        ("inputFile", report.input_file.clone()),
        ("clonesTotal", report.clones_total.to_string()),
        ("totalAlignments", report.total_alignments.to_string()),
        ("totalAlignmentsWithCDR3", report.total_alignments_with_cdr3.to_string()),
        ("totalOverlaps", report.total_overlaps.to_string()),
        ("hqOverlaps", report.hq_overlaps.to_string()),
        ("correctOverlaps", report.correct_overlaps.to_string()),
        ("overlapsFromDifferentClones", report.overlaps_from_different_clones.to_string()),
        ("overlapsProducingNewCDR3", report.overlaps_producing_new_cdr3.to_string()),
        ("hqOverlapsProducingNewCDR3", report.hq_overlaps_producing_new_cdr3.to_string()),
        ("newCDR3Diversity", report.new_cdr3_diversity.to_string()),
        ("hqNewCDR3Diversity", report.hq_new_cdr3_diversity.to_string()),
    ];

    match format {
        OutputFormat::Text => {
            for (name, value) in &rows {
                println!("{name}: {value}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Tsv => {
            let names: Vec<&str> = rows.iter().map(|(name, _)| *name).collect();
            let values: Vec<&str> = rows.iter().map(|(_, value)| value.as_str()).collect();
            println!("{}", names.join("\t"));
            println!("{}", values.join("\t"));
        }
    }

    Ok(())
}
