//! # vdj-assess
//!
//! A library for evaluating immune-repertoire (V(D)J) reconstruction against
//! simulated ground truth.
//!
//! Repertoire assemblers such as MiXCR and TRUST rebuild CDR3 sequences from
//! RNA-Seq reads. On simulated data the true CDR3 of every spiked-in clone is
//! known, so each assembled clone can be checked against it, allowing for a few
//! sequencing or assembly errors.
//!
//! ## Features
//!
//! - **Fuzzy truth lookup**: bounded edit-distance matching, end to end or by contained core
//! - **Concordance tallies**: matched and unmatched clones per error level, per sample and assembler
//! - **False extensions**: V/J extensions that do not reproduce the true CDR3 flank
//! - **False overlaps**: paired-read merges that combine reads from different clones
//!
//! ## Example
//!
//! ```rust
//! use vdj_assess::{FuzzyGroundTruthIndex, MatchMode, TruthRecord, SequenceField};
//!
//! let truth = vec![
//!     TruthRecord::new("c1", "TGTGCCAGCAGTTTAGC", "CASSLA"),
//!     TruthRecord::new("c2", "TGCAGTGCTAGAGAC", "CSARD"),
//! ];
//! let index = FuzzyGroundTruthIndex::build(&truth, SequenceField::Nucleotide).unwrap();
//!
//! let hit = index.search("TGTGCCAGCAGTTTAGG", 2, MatchMode::EndToEnd).unwrap();
//! assert_eq!(hit.id, "c1");
//! assert_eq!(hit.errors, 1);
//! ```
//!
//! ## Modules
//!
//! - [`truth`]: Ground-truth index and bounded edit-distance search
//! - [`matching`]: Per-sample concordance of assembled clones
//! - [`analysis`]: False-extension and false-overlap statistics
//! - [`core`]: Shared domain types
//! - [`parsing`]: Loaders for truth FASTA, MiXCR and TRUST output
//! - [`cli`]: Command-line interface implementation

pub mod analysis;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod truth;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::clone::{ObservedClone, TruthRecord};
pub use core::sample::Sample;
pub use core::types::*;
pub use matching::engine::{ConcordanceConfig, ConcordanceEngine};
pub use truth::{FuzzyGroundTruthIndex, IndexConfig, TruthHit};
