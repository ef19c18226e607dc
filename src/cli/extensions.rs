use std::path::PathBuf;

use clap::Args;

use crate::analysis::extensions::ExtensionReport;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct ExtensionsArgs {
    /// MiXCR alignments export with descrR1, refPoints, readSequence and targetDescriptions
    #[arg(required = true)]
    pub alignments: PathBuf,

    /// MiXCR assemble report
    #[arg(required = true)]
    pub report: PathBuf,
}

/// Execute extensions subcommand
///
/// JSON output is a single line so runs can be appended to a JSON-lines file.
///
/// # Errors
///
/// Returns an error if either input cannot be read or a row is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtensionsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let report = ExtensionReport::from_files(&args.alignments, &args.report)?;

    if verbose {
        eprintln!("Clones total: {}", report.clones_total);
    }

    match format {
        OutputFormat::Text => {
            println!("Input: {}", report.input_file);
            println!("Clones total: {}", report.clones_total);
            println!(
                "L extensions: {} ({} false)",
                report.total_l_extensions, report.false_l_extensions
            );
            println!(
                "R extensions: {} ({} false)",
                report.total_r_extensions, report.false_r_extensions
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Tsv => {
            println!("inputFile\tclonesTotal\ttotalRExtensions\ttotalLExtensions\tfalseRExtensions\tfalseLExtensions");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                report.input_file,
                report.clones_total,
                report.total_r_extensions,
                report.total_l_extensions,
                report.false_r_extensions,
                report.false_l_extensions
            );
        }
    }

    Ok(())
}
