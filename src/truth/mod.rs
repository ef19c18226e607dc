//! Ground-truth CDR3 index with bounded edit-distance lookup.
//!
//! Simulated repertoires come with the CDR3 of every clone that was spiked in.
//! [`FuzzyGroundTruthIndex`] holds those sequences and reconciles assembled
//! CDR3s against them, tolerating a small number of sequencing or assembly
//! errors.
//!
//! ## Matching modes
//!
//! - **End to end**: the whole query aligns to the whole truth sequence with at
//!   most K insertions, deletions or substitutions.
//! - **Contained**: the truth sequence's core (3 characters trimmed from each
//!   end) occurs as an approximate substring of the query with at most K edits.
//!
//! The smallest error level wins; ties go to the sequence inserted first.
//!
//! ## Example
//!
//! ```rust
//! use vdj_assess::truth::FuzzyGroundTruthIndex;
//! use vdj_assess::core::types::MatchMode;
//!
//! let index = FuzzyGroundTruthIndex::from_pairs([
//!     ("seq1", "ACGTACGTAC"),
//!     ("seq2", "TTTTTTTTTT"),
//! ])
//! .unwrap();
//!
//! assert!(index.search("ACGTACGTAG", 0, MatchMode::EndToEnd).is_none());
//! let hit = index.search("ACGTACGTAG", 1, MatchMode::EndToEnd).unwrap();
//! assert_eq!(hit.id, "seq1");
//! ```

pub mod index;
pub mod pattern;

pub use index::{
    FuzzyGroundTruthIndex, IndexConfig, IndexError, TruthEntry, TruthHit, DEFAULT_CORE_TRIM,
};
