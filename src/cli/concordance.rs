use std::path::PathBuf;

use clap::Args;

use crate::cli::{FieldArg, ModeArg, OutputFormat};
use crate::core::types::Chain;
use crate::matching::engine::{
    ConcordanceConfig, ConcordanceEngine, SampleConcordance, DEFAULT_MAX_ERRORS,
};
use crate::truth::{IndexConfig, DEFAULT_CORE_TRIM};

#[derive(Args)]
pub struct ConcordanceArgs {
    /// Simulation root with the truth FASTA and star/, mixcr/ and trust/ directories
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Simulated chain (TRA, TRB, TRD, TRG, IGH, IGK or IGL)
    #[arg(short, long, default_value = "TRB")]
    pub chain: Chain,

    /// Highest error level tallied; every level from 0 is reported
    #[arg(short = 'k', long, default_value_t = DEFAULT_MAX_ERRORS)]
    pub max_errors: u32,

    /// How a clone's CDR3 must align to a truth sequence
    #[arg(long, value_enum, default_value = "end-to-end")]
    pub mode: ModeArg,

    /// CDR3 representations to compare (repeatable)
    #[arg(long, value_enum, default_values_t = [FieldArg::Nt])]
    pub field: Vec<FieldArg>,

    /// Only evaluate these samples (repeatable), e.g. 50bp.hg38.paired
    #[arg(short, long)]
    pub sample: Vec<String>,

    /// Characters trimmed from each end of a truth sequence for contained matching
    #[arg(long, default_value_t = DEFAULT_CORE_TRIM)]
    pub core_trim: usize,
}

impl From<ConcordanceArgs> for ConcordanceConfig {
    fn from(args: ConcordanceArgs) -> Self {
        let mut fields: Vec<_> = Vec::new();
        for field in args.field {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }

        Self {
            root: args.root,
            chain: args.chain,
            max_errors: args.max_errors,
            mode: args.mode.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            samples: args.sample,
            index: IndexConfig {
                core_trim: args.core_trim,
            },
        }
    }
}

/// Execute concordance subcommand
///
/// # Errors
///
/// Returns an error if the truth FASTA, the sample directory or any
/// assembler output cannot be loaded.
pub fn run(args: ConcordanceArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = ConcordanceConfig::from(args);

    if verbose {
        eprintln!(
            "Evaluating {} in {} ({}, up to {} errors)",
            config.chain,
            config.root.display(),
            config.mode,
            config.max_errors
        );
    }

    let engine = ConcordanceEngine::new(config)?;
    let results = engine.run()?;

    if results.is_empty() {
        eprintln!("No samples found.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_results(&results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Tsv => print_tsv_results(&results),
    }

    Ok(())
}

fn print_text_results(results: &[SampleConcordance]) {
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let sample = &result.sample;
        println!(
            "Sample: {} (VDJ: {}, {} bp, {}, {})",
            sample.sample_name,
            if sample.vdj { "yes" } else { "no" },
            sample.read_length,
            sample.build,
            if sample.paired { "paired" } else { "single" }
        );

        for assembler in &result.assemblers {
            println!(
                "  {} [{}]: {} clones",
                assembler.assembler, assembler.field, assembler.tally.total
            );
            for level in &assembler.tally.levels {
                println!(
                    "    k={}: matched {} truth clones / {} records, unmatched {} clones / {} records",
                    level.max_errors,
                    level.matched_clones,
                    level.matched_records,
                    level.unmatched_clones,
                    level.unmatched_records
                );
            }
        }
    }
}

fn print_tsv_results(results: &[SampleConcordance]) {
    let columns = |result: &SampleConcordance| -> Vec<(String, usize)> {
        result.assemblers.iter().flat_map(|a| a.columns()).collect()
    };

    let header: Vec<String> = results
        .first()
        .map(columns)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    println!("sample_name\tvdj\tlen\tref\tpaired\t{}", header.join("\t"));

    for result in results {
        let sample = &result.sample;
        let values: Vec<String> = columns(result).into_iter().map(|(_, v)| v.to_string()).collect();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            sample.sample_name,
            sample.vdj,
            sample.read_length,
            sample.build,
            sample.paired,
            values.join("\t")
        );
    }
}
