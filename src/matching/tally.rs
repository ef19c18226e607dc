use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::MatchMode;
use crate::truth::FuzzyGroundTruthIndex;

/// Matched and unmatched counts at one error level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelCounts {
    /// Error budget these counts were computed with
    pub max_errors: u32,

    /// Distinct truth sequences hit by at least one record
    pub matched_clones: usize,

    /// Records whose CDR3 matched a truth sequence
    pub matched_records: usize,

    /// Distinct CDR3 values among unmatched records
    pub unmatched_clones: usize,

    /// Records whose CDR3 matched nothing
    pub unmatched_records: usize,
}

/// Concordance of a batch of records with the ground truth, per error level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CloneTally {
    /// Number of records queried
    pub total: usize,

    /// One entry per error level, ascending from 0
    pub levels: Vec<LevelCounts>,
}

impl CloneTally {
    /// Counts for error budget `max_errors`, if it was tallied
    #[must_use]
    pub fn level(&self, max_errors: u32) -> Option<&LevelCounts> {
        self.levels.iter().find(|l| l.max_errors == max_errors)
    }

    /// Flattened `(column, value)` pairs, e.g. `mixcr_matched_clones_0`
    #[must_use]
    pub fn columns(&self, prefix: &str) -> Vec<(String, usize)> {
        let mut columns = vec![(format!("{prefix}total"), self.total)];
        for level in &self.levels {
            let k = level.max_errors;
            columns.push((format!("{prefix}matched_clones_{k}"), level.matched_clones));
            columns.push((format!("{prefix}matched_records_{k}"), level.matched_records));
            columns.push((format!("{prefix}unmatched_clones_{k}"), level.unmatched_clones));
            columns.push((format!("{prefix}unmatched_records_{k}"), level.unmatched_records));
        }
        columns
    }
}

/// Query every record against the index and count matches at each error level
/// in `0..=max_errors`
///
/// Each distinct query string is searched once, in parallel. Because a search
/// returns the hit with the smallest error level, a query matches at level `k`
/// exactly when its best hit has at most `k` errors.
pub fn tally<S>(
    index: &FuzzyGroundTruthIndex,
    queries: &[S],
    max_errors: u32,
    mode: MatchMode,
) -> CloneTally
where
    S: AsRef<str> + Sync,
{
    let mut multiplicity: HashMap<&str, usize> = HashMap::new();
    let mut distinct: Vec<&str> = Vec::new();
    for query in queries {
        let query = query.as_ref();
        let count = multiplicity.entry(query).or_insert(0);
        if *count == 0 {
            distinct.push(query);
        }
        *count += 1;
    }

    let best_hits: Vec<Option<(u32, &str)>> = distinct
        .par_iter()
        .map(|query| {
            index
                .search(query, max_errors, mode)
                .map(|hit| (hit.errors, hit.sequence))
        })
        .collect();

    let levels = (0..=max_errors)
        .map(|k| {
            let mut counts = LevelCounts {
                max_errors: k,
                ..LevelCounts::default()
            };
            let mut matched: HashSet<&str> = HashSet::new();

            for (query, hit) in distinct.iter().zip(&best_hits) {
                let records = multiplicity[query];
                match hit {
                    Some((errors, truth)) if *errors <= k => {
                        matched.insert(*truth);
                        counts.matched_records += records;
                    }
                    _ => {
                        counts.unmatched_clones += 1;
                        counts.unmatched_records += records;
                    }
                }
            }

            counts.matched_clones = matched.len();
            counts
        })
        .collect();

    CloneTally {
        total: queries.len(),
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FuzzyGroundTruthIndex {
        FuzzyGroundTruthIndex::from_pairs([
            ("t1", "CASSLGQGAYEQYF"),
            ("t2", "CASSPGTGELFF"),
            ("t3", "CSARDRGNTIYF"),
        ])
        .unwrap()
    }

    #[test]
    fn test_tally_levels() {
        let queries = [
            "CASSLGQGAYEQYF", // exact t1
            "CASSLGQGAYEQYF", // duplicate record
            "CASSPGTGELFW",   // t2 at 1 error
            "CASSPGTGELWW",   // t2 at 2 errors
            "WWWWWWWWWWWW",   // never matches
        ];

        let tally = tally(&index(), &queries, 2, MatchMode::EndToEnd);
        assert_eq!(tally.total, 5);
        assert_eq!(tally.levels.len(), 3);

        let l0 = tally.level(0).unwrap();
        assert_eq!(l0.matched_clones, 1);
        assert_eq!(l0.matched_records, 2);
        assert_eq!(l0.unmatched_clones, 3);
        assert_eq!(l0.unmatched_records, 3);

        let l1 = tally.level(1).unwrap();
        assert_eq!(l1.matched_clones, 2);
        assert_eq!(l1.matched_records, 3);
        assert_eq!(l1.unmatched_clones, 2);
        assert_eq!(l1.unmatched_records, 2);

        // Two records hit t2, but it counts as one matched clone
        let l2 = tally.level(2).unwrap();
        assert_eq!(l2.matched_clones, 2);
        assert_eq!(l2.matched_records, 4);
        assert_eq!(l2.unmatched_clones, 1);
        assert_eq!(l2.unmatched_records, 1);
    }

    #[test]
    fn test_records_partition_at_every_level() {
        let queries = vec![
            "CASSLGQGAYEQYF".to_string(),
            "CSARDRGNTIYW".to_string(),
            "CSARDRGNTIYW".to_string(),
            "QQQ".to_string(),
        ];
        let tally = tally(&index(), &queries, 4, MatchMode::Contained);

        let mut previous = 0;
        for level in &tally.levels {
            assert_eq!(level.matched_records + level.unmatched_records, tally.total);
            assert!(level.matched_records >= previous);
            previous = level.matched_records;
        }
    }

    #[test]
    fn test_columns() {
        let tally = tally(&index(), &["CASSPGTGELFF"], 1, MatchMode::EndToEnd);
        let columns = tally.columns("trust_");
        assert_eq!(columns[0], ("trust_total".to_string(), 1));
        assert_eq!(columns[1], ("trust_matched_clones_0".to_string(), 1));
        assert_eq!(columns[8], ("trust_unmatched_records_1".to_string(), 0));
        assert_eq!(columns.len(), 9);
    }

    #[test]
    fn test_empty_batch() {
        let tally = tally(&index(), &Vec::<String>::new(), 2, MatchMode::EndToEnd);
        assert_eq!(tally.total, 0);
        assert!(tally.levels.iter().all(|l| *l == LevelCounts {
            max_errors: l.max_errors,
            ..LevelCounts::default()
        }));
    }
}
