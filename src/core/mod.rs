//! Core data types shared by the truth index, the loaders and the analyses.
//!
//! - [`TruthRecord`]: a simulated clone with its nucleotide and amino-acid CDR3
//! - [`ObservedClone`]: a clone reported by an assembler
//! - [`Sample`]: a simulated RNA-Seq sample and the report files derived from it
//! - [`SequenceField`], [`MatchMode`], [`Chain`], [`Receptor`], [`GenomeBuild`]
//!
//! [`TruthRecord`]: clone::TruthRecord
//! [`ObservedClone`]: clone::ObservedClone
//! [`Sample`]: sample::Sample
//! [`SequenceField`]: types::SequenceField
//! [`MatchMode`]: types::MatchMode
//! [`Chain`]: types::Chain
//! [`Receptor`]: types::Receptor
//! [`GenomeBuild`]: types::GenomeBuild

pub mod clone;
pub mod sample;
pub mod types;
