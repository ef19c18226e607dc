use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::core::clone::TruthRecord;
use crate::core::types::{MatchMode, SequenceField};
use crate::truth::pattern::{AnchoredPattern, ContainedPattern};

/// Characters trimmed from each end of a truth sequence to form its contained core
pub const DEFAULT_CORE_TRIM: usize = 3;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Truth record '{id}' has an empty sequence")]
    EmptySequence { id: String },

    #[error("Truth record '{id}' has a non-ASCII sequence")]
    NonAscii { id: String },
}

/// Configuration for index construction
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Characters removed from each end of a sequence to form the contained core.
    /// Sequences of at most `2 * core_trim` characters use the whole sequence.
    pub core_trim: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            core_trim: DEFAULT_CORE_TRIM,
        }
    }
}

/// One distinct truth sequence with its precompiled patterns
#[derive(Debug, Clone)]
pub struct TruthEntry {
    id: String,
    sequence: String,
    anchored: AnchoredPattern,
    contained: ContainedPattern,
}

impl TruthEntry {
    fn new(id: String, sequence: String, core_trim: usize) -> Result<Self, IndexError> {
        if sequence.is_empty() {
            return Err(IndexError::EmptySequence { id });
        }
        if !sequence.is_ascii() {
            return Err(IndexError::NonAscii { id });
        }

        let bytes = sequence.as_bytes();
        let core = if bytes.len() > 2 * core_trim {
            &bytes[core_trim..bytes.len() - core_trim]
        } else {
            bytes
        };
        let Some(contained) = ContainedPattern::new(core) else {
            return Err(IndexError::EmptySequence { id });
        };

        Ok(Self {
            anchored: AnchoredPattern::new(bytes),
            contained,
            id,
            sequence,
        })
    }

    /// Identifier of the first record carrying this sequence
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The part of the sequence searched for in contained mode
    #[must_use]
    pub fn core(&self) -> &[u8] {
        self.contained.core()
    }

    fn distance_within(&self, query: &[u8], max_errors: u32, mode: MatchMode) -> Option<u32> {
        match mode {
            MatchMode::EndToEnd => self.anchored.distance_within(query, max_errors),
            MatchMode::Contained => self.contained.distance_within(query, max_errors),
        }
    }
}

/// A truth sequence matched by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruthHit<'a> {
    pub id: &'a str,
    pub sequence: &'a str,
    /// Smallest error level at which the query matched
    pub errors: u32,
}

/// Searchable set of ground-truth CDR3 sequences
///
/// Answers whether a query matches a known sequence within an edit budget,
/// either end to end or by containing the sequence's trimmed core. The index is
/// immutable once built and may be shared across threads.
#[derive(Debug, Clone)]
pub struct FuzzyGroundTruthIndex {
    entries: Vec<TruthEntry>,
    duplicates: usize,
}

impl FuzzyGroundTruthIndex {
    /// Build an index over one CDR3 field of the truth records
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if a sequence is empty or not ASCII.
    pub fn build(records: &[TruthRecord], field: SequenceField) -> Result<Self, IndexError> {
        Self::build_with_config(records, field, &IndexConfig::default())
    }

    /// Build an index over one CDR3 field with a custom configuration
    ///
    /// # Errors
    ///
    /// See [`FuzzyGroundTruthIndex::build`].
    pub fn build_with_config(
        records: &[TruthRecord],
        field: SequenceField,
        config: &IndexConfig,
    ) -> Result<Self, IndexError> {
        let pairs = records
            .iter()
            .map(|record| (record.id.as_str(), record.cdr3(field)));
        let index = Self::from_pairs_with_config(pairs, config)?;
        debug!(
            field = %field,
            records = records.len(),
            distinct = index.len(),
            "Built ground truth index"
        );
        Ok(index)
    }

    /// Build an index from ordered `(id, sequence)` pairs
    ///
    /// # Errors
    ///
    /// See [`FuzzyGroundTruthIndex::build`].
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self::from_pairs_with_config(pairs, &IndexConfig::default())
    }

    /// Build an index from ordered `(id, sequence)` pairs with a custom configuration
    ///
    /// # Errors
    ///
    /// See [`FuzzyGroundTruthIndex::build`].
    pub fn from_pairs_with_config<I, S, T>(pairs: I, config: &IndexConfig) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();
        let mut duplicates = 0;

        for (id, sequence) in pairs {
            let sequence = sequence.into();
            if seen.contains(&sequence) {
                duplicates += 1;
                continue;
            }
            seen.insert(sequence.clone());
            entries.push(TruthEntry::new(id.into(), sequence, config.core_trim)?);
        }

        Ok(Self {
            entries,
            duplicates,
        })
    }

    /// Number of distinct truth sequences
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of input records dropped because their sequence was already indexed
    #[must_use]
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates
    }

    /// Distinct entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[TruthEntry] {
        &self.entries
    }

    /// Find the truth sequence matching `query` at the smallest error level
    ///
    /// Error levels `0..=max_errors` are considered; insertions, deletions and
    /// substitutions each cost one. Among entries matching at the same level the
    /// earliest inserted wins, so the result equals probing each level in
    /// ascending order and stopping at the first entry that matches.
    #[must_use]
    pub fn search(&self, query: &str, max_errors: u32, mode: MatchMode) -> Option<TruthHit<'_>> {
        let query = query.as_bytes();
        let mut best: Option<(u32, &TruthEntry)> = None;

        for entry in &self.entries {
            // Later entries must strictly beat the current best to replace it
            let budget = match best {
                Some((0, _)) => break,
                Some((errors, _)) => errors - 1,
                None => max_errors,
            };
            if let Some(errors) = entry.distance_within(query, budget, mode) {
                best = Some((errors, entry));
            }
        }

        best.map(|(errors, entry)| TruthHit {
            id: &entry.id,
            sequence: &entry.sequence,
            errors,
        })
    }
}
