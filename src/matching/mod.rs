//! Concordance of assembled clones with the simulated ground truth.
//!
//! - [`tally`]: per-error-level matched/unmatched counts for one batch of CDR3s
//! - [`engine`]: walks a simulation root, loads MiXCR and TRUST output for
//!   every sample and tallies each against the truth index
//!
//! ## Example
//!
//! ```rust,no_run
//! use vdj_assess::core::types::Chain;
//! use vdj_assess::matching::engine::{ConcordanceConfig, ConcordanceEngine};
//!
//! let config = ConcordanceConfig::new("simulation", Chain::default());
//! let engine = ConcordanceEngine::new(config).unwrap();
//!
//! for sample in engine.run().unwrap() {
//!     for result in &sample.assemblers {
//!         println!("{} {}: {} clones", sample.sample.sample_name, result.assembler, result.tally.total);
//!     }
//! }
//! ```

pub mod engine;
pub mod tally;
