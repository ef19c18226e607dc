//! False paired-read overlap statistics.
//!
//! When MiXCR merges two reads through a V-J overlap, the merged alignment
//! should carry the CDR3 both reads were simulated from. Joining every merged
//! alignment back to the simulated CDR3 of its two source reads shows how many
//! merges combined reads from different clones and produced a CDR3 that
//! neither read carried.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisError;
use crate::parsing::report::parse_assemble_report;
use crate::parsing::table::{field, non_empty_field, TsvTable};

static CLONE_CDR3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GClone\|([^|]*)\|").expect("valid clone description regex"));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").expect("valid bracket regex"));

static VJ_OVERLAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"VJOverlap\([0-9]+\) = [LR]([0-9]+)\.[01] \+ [LR]([0-9]+)\.[01]")
        .expect("valid overlap regex")
});

/// Minimum CDR3 quality of a high-quality overlap
pub const HQ_MIN_QUALITY: f64 = 20.0;

/// Simulated CDR3 of each read id; a read id may appear on several rows
#[derive(Debug, Clone, Default)]
pub struct ReadCdr3s {
    by_id: HashMap<u64, Vec<Option<String>>>,
}

impl ReadCdr3s {
    /// Build from a table with `readId` and `descrR1` columns
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or a read id is not an integer.
    pub fn from_table(table: &TsvTable) -> Result<Self, AnalysisError> {
        let id_col = table.column("readId")?;
        let descr_col = table.column("descrR1")?;
        let mut by_id: HashMap<u64, Vec<Option<String>>> = HashMap::new();

        for (i, record) in table.records().iter().enumerate() {
            let raw = field(record, id_col);
            let id = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| AnalysisError::invalid(i + 1, format!("invalid readId '{raw}'")))?;
            let cdr3 = CLONE_CDR3
                .captures(field(record, descr_col))
                .map(|caps| caps[1].to_string());
            by_id.entry(id).or_default().push(cdr3);
        }

        Ok(Self { by_id })
    }

    /// Every CDR3 recorded for `read_id`, empty for unknown ids
    #[must_use]
    pub fn get(&self, read_id: u64) -> &[Option<String>] {
        self.by_id.get(&read_id).map_or(&[], Vec::as_slice)
    }
}

/// Read ids merged by a `VJOverlap` target description, ignoring `[...]` groups
#[must_use]
pub fn overlap_read_ids(target_descriptions: &str) -> Option<(u64, u64)> {
    let stripped = BRACKETED.replace_all(target_descriptions, "");
    let caps = VJ_OVERLAP.captures(&stripped)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Equality where a missing value equals nothing, not even another missing value
fn same(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// One merged alignment joined to the CDR3s of its two source reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedOverlap<'a> {
    pub first_cdr3: Option<&'a str>,
    pub second_cdr3: Option<&'a str>,
    pub merged_cdr3: Option<&'a str>,
    pub min_quality: f64,
}

impl JoinedOverlap<'_> {
    #[must_use]
    pub fn is_high_quality(&self) -> bool {
        self.min_quality >= HQ_MIN_QUALITY
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        same(self.first_cdr3, self.second_cdr3)
    }

    /// Reads from different clones merged into a CDR3 neither of them had
    #[must_use]
    pub fn produces_new_cdr3(&self) -> bool {
        !same(self.first_cdr3, self.merged_cdr3)
            && !same(self.second_cdr3, self.merged_cdr3)
            && !self.is_correct()
    }
}

/// Counts over the merged alignments of one run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlapCounts {
    pub total_alignments: usize,
    pub total_alignments_with_cdr3: usize,
    pub total_overlaps: usize,
    pub hq_overlaps: usize,
    pub correct_overlaps: usize,
    pub overlaps_from_different_clones: usize,
    pub overlaps_producing_new_cdr3: usize,
    pub hq_overlaps_producing_new_cdr3: usize,
    pub new_cdr3_diversity: usize,
    pub hq_new_cdr3_diversity: usize,
}

/// Join the overlapped alignments with the read CDR3s and count the outcomes
///
/// An alignment is counted once per (first read row, second read row) pair,
/// and not at all if either read id is unknown.
///
/// # Errors
///
/// Returns an error if a column is missing or `minQualCDR3` is not a number.
pub fn count_overlaps(reads: &ReadCdr3s, overlapped: &TsvTable) -> Result<OverlapCounts, AnalysisError> {
    let targets_col = overlapped.column("targetDescriptions")?;
    let cdr3_col = overlapped.column("nSeqCDR3")?;
    let qual_col = overlapped.column("minQualCDR3")?;

    let mut counts = OverlapCounts {
        total_alignments: overlapped.len(),
        ..OverlapCounts::default()
    };
    let mut new_cdr3s: HashSet<Option<&str>> = HashSet::new();
    let mut hq_new_cdr3s: HashSet<Option<&str>> = HashSet::new();

    for (i, record) in overlapped.records().iter().enumerate() {
        let merged_cdr3 = non_empty_field(record, cdr3_col);
        if merged_cdr3.is_some() {
            counts.total_alignments_with_cdr3 += 1;
        }

        let Some((first, second)) = overlap_read_ids(field(record, targets_col)) else {
            continue;
        };
        let min_quality = match non_empty_field(record, qual_col) {
            None => 0.0,
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                AnalysisError::invalid(i + 1, format!("invalid minQualCDR3 '{raw}'"))
            })?,
        };

        for first_cdr3 in reads.get(first) {
            for second_cdr3 in reads.get(second) {
                let joined = JoinedOverlap {
                    first_cdr3: first_cdr3.as_deref(),
                    second_cdr3: second_cdr3.as_deref(),
                    merged_cdr3,
                    min_quality,
                };

                counts.total_overlaps += 1;
                if joined.is_high_quality() {
                    counts.hq_overlaps += 1;
                }
                if joined.is_correct() {
                    counts.correct_overlaps += 1;
                } else {
                    counts.overlaps_from_different_clones += 1;
                }
                if joined.produces_new_cdr3() {
                    counts.overlaps_producing_new_cdr3 += 1;
                    new_cdr3s.insert(merged_cdr3);
                    if joined.is_high_quality() {
                        counts.hq_overlaps_producing_new_cdr3 += 1;
                        hq_new_cdr3s.insert(merged_cdr3);
                    }
                }
            }
        }
    }

    counts.new_cdr3_diversity = new_cdr3s.len();
    counts.hq_new_cdr3_diversity = hq_new_cdr3s.len();
    Ok(counts)
}

/// False-overlap statistics for one run, serialized as one JSON line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapReport {
    #[serde(rename = "inputFile")]
    pub input_file: String,
    #[serde(rename = "clonesTotal")]
    pub clones_total: u64,
    #[serde(rename = "totalAlignments")]
    pub total_alignments: usize,
    #[serde(rename = "totalAlignmentsWithCDR3")]
    pub total_alignments_with_cdr3: usize,
    #[serde(rename = "totalOverlaps")]
    pub total_overlaps: usize,
    #[serde(rename = "hqOverlaps")]
    pub hq_overlaps: usize,
    #[serde(rename = "correctOverlaps")]
    pub correct_overlaps: usize,
    #[serde(rename = "overlapsFromDifferentClones")]
    pub overlaps_from_different_clones: usize,
    #[serde(rename = "overlapsProducingNewCDR3")]
    pub overlaps_producing_new_cdr3: usize,
    #[serde(rename = "hqOverlapsProducingNewCDR3")]
    pub hq_overlaps_producing_new_cdr3: usize,
    #[serde(rename = "newCDR3Diversity")]
    pub new_cdr3_diversity: usize,
    #[serde(rename = "hqNewCDR3Diversity")]
    pub hq_new_cdr3_diversity: usize,
}

impl OverlapReport {
    #[must_use]
    pub fn new(input_file: impl Into<String>, clones_total: u64, counts: OverlapCounts) -> Self {
        Self {
            input_file: input_file.into(),
            clones_total,
            total_alignments: counts.total_alignments,
            total_alignments_with_cdr3: counts.total_alignments_with_cdr3,
            total_overlaps: counts.total_overlaps,
            hq_overlaps: counts.hq_overlaps,
            correct_overlaps: counts.correct_overlaps,
            overlaps_from_different_clones: counts.overlaps_from_different_clones,
            overlaps_producing_new_cdr3: counts.overlaps_producing_new_cdr3,
            hq_overlaps_producing_new_cdr3: counts.hq_overlaps_producing_new_cdr3,
            new_cdr3_diversity: counts.new_cdr3_diversity,
            hq_new_cdr3_diversity: counts.hq_new_cdr3_diversity,
        }
    }

    /// Build the report from the read table, the overlapped alignments and the assemble report
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or a row is malformed.
    pub fn from_files(
        read_descriptions: &Path,
        overlapped: &Path,
        assemble_report: &Path,
    ) -> Result<Self, AnalysisError> {
        let reads = ReadCdr3s::from_table(&TsvTable::from_path(read_descriptions)?)?;
        let alignments = TsvTable::from_path(overlapped)?;
        let counts = count_overlaps(&reads, &alignments)?;
        let clones_total = parse_assemble_report(assemble_report)?;

        info!(
            alignments = counts.total_alignments,
            overlaps = counts.total_overlaps,
            new_cdr3 = counts.overlaps_producing_new_cdr3,
            "Joined overlapped alignments"
        );

        Ok(Self::new(overlapped.display().to_string(), clones_total, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reads() -> ReadCdr3s {
        let text = "readId\tdescrR1
1\tGClone|CASSA|x
2\tGClone|CASSA|x
3\tGClone|CASSB|x
4\tno clone here
5\tGClone|CASSC|x
5\tGClone|CASSD|x
";
        ReadCdr3s::from_table(&TsvTable::from_reader(text.as_bytes()).unwrap()).unwrap()
    }

    fn overlapped(rows: &str) -> TsvTable {
        let text = format!("targetDescriptions\tnSeqCDR3\tminQualCDR3\n{rows}");
        TsvTable::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_read_cdr3s() {
        let reads = reads();
        assert_eq!(reads.get(1), &[Some("CASSA".to_string())]);
        assert_eq!(reads.get(4), &[None]);
        assert_eq!(reads.get(5).len(), 2);
        assert!(reads.get(99).is_empty());
    }

    #[test]
    fn test_invalid_read_id() {
        let table = TsvTable::from_reader("readId\tdescrR1\nabc\tGClone|A|\n".as_bytes()).unwrap();
        assert!(matches!(
            ReadCdr3s::from_table(&table),
            Err(AnalysisError::InvalidRecord { row: 1, .. })
        ));
    }

    #[test]
    fn test_overlap_read_ids_strips_brackets() {
        assert_eq!(
            overlap_read_ids("VJOverlap(12) = L1.0 + R3.1"),
            Some((1, 3))
        );
        assert_eq!(
            overlap_read_ids("VJOverlap(12) = L7[x].0 + R8[y=2].1"),
            Some((7, 8))
        );
        // Stripping a spaced group leaves a double space
        assert_eq!(overlap_read_ids("VJOverlap(12) = [x] L7.0 + R8.1"), None);
        assert_eq!(overlap_read_ids("VJOverlap(12) = L1.2 + R3.1"), None);
        assert_eq!(overlap_read_ids(""), None);
    }

    #[test]
    fn test_missing_values_never_equal() {
        assert!(same(Some("A"), Some("A")));
        assert!(!same(Some("A"), Some("B")));
        assert!(!same(None, Some("A")));
        assert!(!same(None, None));
    }

    #[test]
    fn test_count_overlaps() {
        let table = overlapped(
            "VJOverlap(10) = L1.0 + R2.1\tCASSA\t30
VJOverlap(10) = L1.0 + R3.1\tCASSX\t25
VJOverlap(10) = L1.0 + R3.1\tCASSX\t10
VJOverlap(10) = L4.0 + R4.1\t\t
VJOverlap(10) = L1.0 + R5.1\tCASSA\t40
VJOverlap(10) = L1.0 + R99.1\tCASSA\t40
V + J\tCASSQ\t40
",
        );
        let counts = count_overlaps(&reads(), &table).unwrap();

        assert_eq!(counts.total_alignments, 7);
        assert_eq!(counts.total_alignments_with_cdr3, 6);
        // Read 5 has two rows; read 99 is unknown
        assert_eq!(counts.total_overlaps, 6);
        assert_eq!(counts.hq_overlaps, 4);
        assert_eq!(counts.correct_overlaps, 1);
        assert_eq!(counts.overlaps_from_different_clones, 5);
        // 1+3 twice and the all-missing 4+4 merge
        assert_eq!(counts.overlaps_producing_new_cdr3, 3);
        assert_eq!(counts.hq_overlaps_producing_new_cdr3, 1);
        assert_eq!(counts.new_cdr3_diversity, 2);
        assert_eq!(counts.hq_new_cdr3_diversity, 1);
    }

    #[test]
    fn test_invalid_quality() {
        let table = overlapped("VJOverlap(10) = L1.0 + R2.1\tCASSA\thigh\n");
        assert!(count_overlaps(&reads(), &table).is_err());
    }

    #[test]
    fn test_report_json_keys() {
        let report = OverlapReport::new("run.tsv", 3, OverlapCounts::default());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["inputFile"], "run.tsv");
        assert_eq!(value["totalAlignmentsWithCDR3"], 0);
        assert_eq!(value["hqNewCDR3Diversity"], 0);
        assert_eq!(value.as_object().unwrap().len(), 12);
    }
}
