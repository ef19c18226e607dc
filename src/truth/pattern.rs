//! Precompiled bounded-error patterns for a single truth sequence.

use bio::alignment::distance::simd::bounded_levenshtein;
use bio::pattern_matching::myers::long::Myers;

/// Whole-query against whole-sequence matching within an edit budget
#[derive(Debug, Clone)]
pub struct AnchoredPattern {
    sequence: Vec<u8>,
}

impl AnchoredPattern {
    #[must_use]
    pub fn new(sequence: &[u8]) -> Self {
        Self {
            sequence: sequence.to_vec(),
        }
    }

    /// Edit distance between `query` and the full sequence, if it is at most `max_errors`
    #[must_use]
    pub fn distance_within(&self, query: &[u8], max_errors: u32) -> Option<u32> {
        // Each unmatched length position costs one indel
        let length_gap = self.sequence.len().abs_diff(query.len());
        if u32::try_from(length_gap).map_or(true, |gap| gap > max_errors) {
            return None;
        }
        bounded_levenshtein(&self.sequence, query, max_errors)
    }
}

/// Approximate substring search of a sequence core anywhere in a query
///
/// Uses Myers' bit-vector algorithm, so the best-scoring occurrence over all
/// end positions in the query is found in a single pass. Cores longer than
/// one word are split over several blocks.
#[derive(Debug, Clone)]
pub struct ContainedPattern {
    core: Vec<u8>,
    core_len: u32,
    myers: Myers<u64>,
}

impl ContainedPattern {
    /// Compile a core; returns `None` if it is empty
    #[must_use]
    pub fn new(core: &[u8]) -> Option<Self> {
        if core.is_empty() {
            return None;
        }
        let core_len = u32::try_from(core.len()).ok()?;
        Some(Self {
            core: core.to_vec(),
            core_len,
            myers: Myers::<u64>::new(core),
        })
    }

    #[must_use]
    pub fn core(&self) -> &[u8] {
        &self.core
    }

    /// Smallest edit distance of the core against any substring of `query`,
    /// if it is at most `max_errors`
    #[must_use]
    pub fn distance_within(&self, query: &[u8], max_errors: u32) -> Option<u32> {
        if query.is_empty() {
            // Only deleting the whole core aligns against nothing
            return (self.core_len <= max_errors).then_some(self.core_len);
        }
        self.myers
            .find_all_end(query, max_errors as usize)
            .filter_map(|(_, dist)| u32::try_from(dist).ok())
            .min()
    }
}
