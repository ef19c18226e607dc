//! Command-line interface for vdj-assess.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **lookup**: Find the truth CDR3 closest to each query sequence
//! - **concordance**: Tally MiXCR and TRUST clones against the simulated truth, per sample
//! - **extensions**: Count false V/J extensions in a MiXCR alignments export
//! - **extension-summary**: Total false extensions over many runs
//! - **overlaps**: Count paired-read overlaps that merged different clones
//! - **overlap-summary**: Maximum bad-overlap rates over many runs
//!
//! ## Usage
//!
//! ```text
//! # Concordance for every sample of a simulation
//! vdj-assess concordance --root sim/ --chain TRB --format tsv > concordance.tsv
//!
//! # Per-run extension report, appended as one JSON line
//! vdj-assess -f json extensions alignments.tsv assemble.report >> extensions.jsonl
//! vdj-assess extension-summary extensions.jsonl
//!
//! # Fuzzy lookup of a single CDR3
//! vdj-assess lookup in_silico_TRB.fasta TGTGCCAGCAGTTTAGC --max-errors 2
//! ```

use clap::{Parser, Subcommand};

use crate::core::types::{MatchMode, SequenceField};

pub mod concordance;
pub mod extensions;
pub mod lookup;
pub mod overlaps;
pub mod summary;

#[derive(Parser)]
#[command(name = "vdj-assess")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Evaluate V(D)J repertoire assembly against simulated ground truth")]
#[command(
    long_about = "vdj-assess compares repertoire reconstructions from simulated reads with the clones that were simulated.\n\nIt provides:\n- Fuzzy CDR3 concordance for MiXCR and TRUST output\n- False V/J extension rates\n- False paired-read overlap rates"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the closest truth CDR3 for query sequences
    Lookup(lookup::LookupArgs),

    /// Tally assembled clones against the simulated truth for every sample
    Concordance(concordance::ConcordanceArgs),

    /// Count false V/J extensions for one run
    Extensions(extensions::ExtensionsArgs),

    /// Summarize extension reports from many runs
    ExtensionSummary(summary::ExtensionSummaryArgs),

    /// Count false paired-read overlaps for one run
    Overlaps(overlaps::OverlapsArgs),

    /// Summarize overlap reports from many runs
    OverlapSummary(summary::OverlapSummaryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// CDR3 representation to compare
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FieldArg {
    /// Nucleotide CDR3
    Nt,
    /// Amino-acid CDR3
    Aa,
}

impl From<FieldArg> for SequenceField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Nt => Self::Nucleotide,
            FieldArg::Aa => Self::AminoAcid,
        }
    }
}

/// How a query must align to a truth sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// The whole query against the whole truth sequence
    EndToEnd,
    /// The trimmed truth core anywhere inside the query
    Contained,
}

impl From<ModeArg> for MatchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::EndToEnd => Self::EndToEnd,
            ModeArg::Contained => Self::Contained,
        }
    }
}
