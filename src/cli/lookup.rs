use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rayon::prelude::*;

use crate::cli::{FieldArg, ModeArg, OutputFormat};
use crate::core::types::{MatchMode, SequenceField};
use crate::parsing::truth::parse_truth_file;
use crate::truth::{FuzzyGroundTruthIndex, IndexConfig, TruthHit, DEFAULT_CORE_TRIM};

#[derive(Args)]
pub struct LookupArgs {
    /// Truth FASTA (`>id|ntCDR3|aaCDR3|...` definition lines, optionally gzipped)
    #[arg(required = true)]
    pub truth: PathBuf,

    /// Query sequences
    pub queries: Vec<String>,

    /// File with one query per line; '-' reads stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Highest number of edits allowed
    #[arg(short = 'k', long, default_value = "0")]
    pub max_errors: u32,

    /// How a query must align to a truth sequence
    #[arg(long, value_enum, default_value = "end-to-end")]
    pub mode: ModeArg,

    /// CDR3 representation to search
    #[arg(long, value_enum, default_value = "nt")]
    pub field: FieldArg,

    /// Characters trimmed from each end of a truth sequence for contained matching
    #[arg(long, default_value_t = DEFAULT_CORE_TRIM)]
    pub core_trim: usize,
}

fn read_queries(args: &LookupArgs) -> anyhow::Result<Vec<String>> {
    let mut queries = args.queries.clone();

    if let Some(path) = &args.input {
        let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
            Box::new(BufReader::new(std::io::stdin()))
        } else {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        };

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                queries.push(line.to_string());
            }
        }
    }

    Ok(queries)
}

/// Execute lookup subcommand
///
/// # Errors
///
/// Returns an error if the truth FASTA cannot be loaded or indexed, or no
/// queries were given.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LookupArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let queries = read_queries(&args)?;
    if queries.is_empty() {
        anyhow::bail!("No query sequences given; pass them as arguments or with --input");
    }

    let records = parse_truth_file(&args.truth)
        .with_context(|| format!("Failed to load truth FASTA {}", args.truth.display()))?;
    let field = SequenceField::from(args.field);
    let config = IndexConfig {
        core_trim: args.core_trim,
    };
    let index = FuzzyGroundTruthIndex::build_with_config(&records, field, &config)?;

    if verbose {
        eprintln!(
            "Indexed {} distinct {field} sequences ({} duplicates removed)",
            index.len(),
            index.duplicates_removed()
        );
    }

    let mode = MatchMode::from(args.mode);
    let hits: Vec<Option<TruthHit<'_>>> = queries
        .par_iter()
        .map(|q| index.search(q, args.max_errors, mode))
        .collect();

    match format {
        OutputFormat::Text => print_text_results(&queries, &hits),
        OutputFormat::Json => print_json_results(&queries, &hits)?,
        OutputFormat::Tsv => print_tsv_results(&queries, &hits),
    }

    Ok(())
}

fn print_text_results(queries: &[String], hits: &[Option<TruthHit<'_>>]) {
    for (query, hit) in queries.iter().zip(hits) {
        match hit {
            Some(hit) => println!(
                "{query}\t{} ({} error{})",
                hit.id,
                hit.errors,
                if hit.errors == 1 { "" } else { "s" }
            ),
            None => println!("{query}\tno match"),
        }
    }
}

fn print_json_results(queries: &[String], hits: &[Option<TruthHit<'_>>]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = queries
        .iter()
        .zip(hits)
        .map(|(query, hit)| {
            serde_json::json!({
                "query": query,
                "id": hit.map(|h| h.id),
                "sequence": hit.map(|h| h.sequence),
                "errors": hit.map(|h| h.errors),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(queries: &[String], hits: &[Option<TruthHit<'_>>]) {
    println!("query\tid\tsequence\terrors");
    for (query, hit) in queries.iter().zip(hits) {
        match hit {
            Some(hit) => println!("{query}\t{}\t{}\t{}", hit.id, hit.sequence, hit.errors),
            None => println!("{query}\t\t\t"),
        }
    }
}
