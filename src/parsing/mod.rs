//! Loaders for the reports produced around a simulated repertoire run.
//!
//! This module provides parsers for:
//!
//! - **In-silico truth FASTA**: simulated clones with `|`-separated CDR3 fields
//! - **MiXCR clone tables**: tab-separated `exportClones` output
//! - **TRUST contig FASTA**: `+`-separated contig headers
//! - **STAR alignment names**: sample parameters encoded in BAM file names
//! - **Assemble reports**: the clonotype read count line
//! - **TSV tables**: header-keyed access to MiXCR exports
//!
//! ## Example
//!
//! ```rust,no_run
//! use vdj_assess::parsing::truth::parse_truth_file;
//! use std::path::Path;
//!
//! let truth = parse_truth_file(Path::new("in_silico_TRB.fasta")).unwrap();
//! println!("{} simulated clones", truth.len());
//! ```

use thiserror::Error;

pub mod mixcr;
pub mod report;
pub mod samples;
pub mod table;
pub mod trust;
pub mod truth;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}'")]
    MissingColumn(String),
}
