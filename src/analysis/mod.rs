//! Error statistics over MiXCR exports from simulated runs.
//!
//! - [`extensions`]: how often V/J extension reconstructs the wrong CDR3 flank
//! - [`overlaps`]: how often paired-read overlap merges reads from different clones
//! - [`summary`]: maxima and totals over many per-run reports (JSON lines)

use thiserror::Error;

use crate::parsing::ParseError;

pub mod extensions;
pub mod overlaps;
pub mod summary;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid record on row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error("Invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn invalid(row: usize, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            row,
            message: message.into(),
        }
    }
}
