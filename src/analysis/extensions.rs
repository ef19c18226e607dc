//! False V/J extension statistics.
//!
//! MiXCR can extend a partially covered CDR3 using germline sequence
//! (`LExtended` on the V side, `RExtended`/`MExtended` on the J side). For
//! simulated reads the true CDR3 is carried in the read description, so each
//! extension can be checked against the bases it should have produced.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::AnalysisError;
use crate::parsing::report::parse_assemble_report;
use crate::parsing::table::{field, TsvTable};
use crate::utils::slicing::clamped_slice;

static ANCHOR_POINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:-?[0-9]*:){8}(?:-?[0-9]*):",
        r"(?P<cdr3_begin>-?[0-9]*):(?P<v3_deletion>-?[0-9]*):(?P<v_end>-?[0-9]*):",
        r"(?P<d_begin>-?[0-9]*):(?P<d5_deletion>-?[0-9]*):(?P<d3_deletion>-?[0-9]*):",
        r"(?P<d_end>-?[0-9]*):(?P<j_begin>-?[0-9]*):(?P<j5_deletion>-?[0-9]*):",
        r"(?P<cdr3_end>-?[0-9]*):(?:-?[0-9]*:){2}(?:-?[0-9]*)$",
    ))
    .expect("valid anchor points regex")
});

static LEFT_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"LExtended\(([0-9]+)\)").expect("valid left extension regex"));

static RIGHT_EXTENSION_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[RM]Extended").expect("valid right extension regex"));

static RIGHT_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]+)\] \+ [RM]Extended\(([0-9]+)\)").expect("valid right extension regex")
});

const DESCRIPTION_COLUMN: &str = "descrR1";
const REF_POINTS_COLUMN: &str = "refPoints";
const READ_SEQUENCE_COLUMN: &str = "readSequence";
const TARGET_DESCRIPTIONS_COLUMN: &str = "targetDescriptions";

/// Reference points of one alignment, as exported in MiXCR's `refPoints` column
///
/// Only the CDR3-adjacent points are kept. Points that are empty, or all of
/// them when the string does not have the expected 22 fields, are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorPoints {
    pub cdr3_begin: Option<i64>,
    pub v3_deletion: Option<i64>,
    pub v_end: Option<i64>,
    pub d_begin: Option<i64>,
    pub d5_deletion: Option<i64>,
    pub d3_deletion: Option<i64>,
    pub d_end: Option<i64>,
    pub j_begin: Option<i64>,
    pub j5_deletion: Option<i64>,
    pub cdr3_end: Option<i64>,
}

impl AnchorPoints {
    #[must_use]
    pub fn parse(ref_points: &str) -> Self {
        let Some(caps) = ANCHOR_POINTS.captures(ref_points) else {
            return Self::default();
        };
        let point = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<i64>().ok());

        Self {
            cdr3_begin: point("cdr3_begin"),
            v3_deletion: point("v3_deletion"),
            v_end: point("v_end"),
            d_begin: point("d_begin"),
            d5_deletion: point("d5_deletion"),
            d3_deletion: point("d3_deletion"),
            d_end: point("d_end"),
            j_begin: point("j_begin"),
            j5_deletion: point("j5_deletion"),
            cdr3_end: point("cdr3_end"),
        }
    }
}

/// One read of a paired alignment row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mate<'a> {
    /// 1-based data row the mate came from
    pub row: usize,
    pub description: &'a str,
    pub ref_points: &'a str,
    pub read_sequence: &'a str,
    pub target_descriptions: &'a str,
}

impl<'a> Mate<'a> {
    /// Simulated CDR3, the second `|`-separated field of the read description
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidRecord` if the description has no second field.
    pub fn true_cdr3(&self) -> Result<&'a str, AnalysisError> {
        self.description.split('|').nth(1).ok_or_else(|| {
            AnalysisError::invalid(
                self.row,
                format!("read description '{}' has no CDR3 field", self.description),
            )
        })
    }

    #[must_use]
    pub fn anchor_points(&self) -> AnchorPoints {
        AnchorPoints::parse(self.ref_points)
    }
}

fn mate_value(value: &str, mate: usize) -> &str {
    value.split(',').nth(mate).unwrap_or("")
}

/// Split each row into its R1 and R2 mates
///
/// Multi-read columns hold one comma-separated value per mate. R2 is absent
/// when its `refPoints` element is missing or empty.
///
/// # Errors
///
/// Returns `AnalysisError::Parse` if a required column is missing.
pub fn split_mates(table: &TsvTable) -> Result<Vec<Mate<'_>>, AnalysisError> {
    let descr = table.column(DESCRIPTION_COLUMN)?;
    let ref_points = table.column(REF_POINTS_COLUMN)?;
    let read_sequence = table.column(READ_SEQUENCE_COLUMN)?;
    let targets = table.column(TARGET_DESCRIPTIONS_COLUMN)?;

    let mut first = Vec::with_capacity(table.len());
    let mut second = Vec::new();

    for (i, record) in table.records().iter().enumerate() {
        let row = i + 1;
        let description = field(record, descr);
        let mate = |n: usize| Mate {
            row,
            description,
            ref_points: mate_value(field(record, ref_points), n),
            read_sequence: mate_value(field(record, read_sequence), n),
            target_descriptions: mate_value(field(record, targets), n),
        };

        first.push(mate(0));
        let r2 = mate(1);
        if r2.ref_points.is_empty() {
            debug!(row, "No R2 alignment, skipping mate");
        } else {
            second.push(r2);
        }
    }

    first.extend(second);
    Ok(first)
}

/// Side of the CDR3 an extension was added to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionSide {
    Left,
    Right,
}

/// Bases added by an extension next to the bases the truth has at that position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension<'a> {
    pub side: ExtensionSide,
    pub actual: &'a [u8],
    pub expected: &'a [u8],
}

impl Extension<'_> {
    #[must_use]
    pub fn is_false(&self) -> bool {
        self.actual != self.expected
    }
}

fn capture_i64(caps: &regex::Captures<'_>, group: usize) -> Option<i64> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// V-side extension of a mate, if its target was left-extended
///
/// # Errors
///
/// Returns `AnalysisError::InvalidRecord` if the target is marked `LExtended`
/// without a length, or the read description has no CDR3.
pub fn left_extension<'a>(mate: &Mate<'a>) -> Result<Option<Extension<'a>>, AnalysisError> {
    if !mate.target_descriptions.contains("LExtended") {
        return Ok(None);
    }

    let length = LEFT_EXTENSION
        .captures(mate.target_descriptions)
        .and_then(|caps| capture_i64(&caps, 1))
        .ok_or_else(|| {
            AnalysisError::invalid(
                mate.row,
                format!("no LExtended length in '{}'", mate.target_descriptions),
            )
        })?;
    let truth = mate.true_cdr3()?;

    Ok(Some(Extension {
        side: ExtensionSide::Left,
        actual: clamped_slice(mate.read_sequence.as_bytes(), 0, length),
        expected: clamped_slice(truth.as_bytes(), 0, length),
    }))
}

/// J-side extension of a mate, if its target was right- or merge-extended
///
/// The extension's position in the true CDR3 is measured back from `CDR3End`
/// when that point is known and forward from `CDR3Begin` otherwise.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidRecord` if the extension has no offset and
/// length, both CDR3 anchor points are missing, or the read description has
/// no CDR3.
pub fn right_extension<'a>(mate: &Mate<'a>) -> Result<Option<Extension<'a>>, AnalysisError> {
    if !RIGHT_EXTENSION_MARK.is_match(mate.target_descriptions) {
        return Ok(None);
    }

    let (offset, length) = RIGHT_EXTENSION
        .captures(mate.target_descriptions)
        .and_then(|caps| Some((capture_i64(&caps, 1)?, capture_i64(&caps, 2)?)))
        .ok_or_else(|| {
            AnalysisError::invalid(
                mate.row,
                format!("no extension offset in '{}'", mate.target_descriptions),
            )
        })?;
    let truth = mate.true_cdr3()?;
    let truth_len = i64::try_from(truth.len()).unwrap_or(i64::MAX);

    let anchors = mate.anchor_points();
    let truth_offset = match (anchors.cdr3_end, anchors.cdr3_begin) {
        (Some(end), _) => offset.checked_sub(end).and_then(|d| d.checked_add(truth_len)),
        (None, Some(begin)) => offset.checked_sub(begin),
        (None, None) => {
            return Err(AnalysisError::invalid(
                mate.row,
                format!("no CDR3 anchor points in '{}'", mate.ref_points),
            ))
        }
    };
    let overflow = || AnalysisError::invalid(mate.row, "extension position out of range");
    let truth_offset = truth_offset.ok_or_else(overflow)?;
    let actual_end = offset.checked_add(length).ok_or_else(overflow)?;
    let expected_end = truth_offset.checked_add(length).ok_or_else(overflow)?;

    Ok(Some(Extension {
        side: ExtensionSide::Right,
        actual: clamped_slice(mate.read_sequence.as_bytes(), offset, actual_end),
        expected: clamped_slice(truth.as_bytes(), truth_offset, expected_end),
    }))
}

/// Extension totals over a set of mates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtensionCounts {
    pub total_left: usize,
    pub total_right: usize,
    pub false_left: usize,
    pub false_right: usize,
}

impl ExtensionCounts {
    fn add(&mut self, extension: &Extension<'_>) {
        let bad = usize::from(extension.is_false());
        match extension.side {
            ExtensionSide::Left => {
                self.total_left += 1;
                self.false_left += bad;
            }
            ExtensionSide::Right => {
                self.total_right += 1;
                self.false_right += bad;
            }
        }
    }
}

/// Count extensions and false extensions over every mate of an alignments export
///
/// # Errors
///
/// Returns an error if a column is missing or an extended mate is malformed.
pub fn count_extensions(table: &TsvTable) -> Result<ExtensionCounts, AnalysisError> {
    let mut counts = ExtensionCounts::default();

    for mate in split_mates(table)? {
        if let Some(extension) = left_extension(&mate)? {
            counts.add(&extension);
        }
        if let Some(extension) = right_extension(&mate)? {
            counts.add(&extension);
        }
    }

    Ok(counts)
}

/// False-extension statistics for one run, serialized as one JSON line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionReport {
    pub input_file: String,
    pub clones_total: u64,
    pub total_r_extensions: usize,
    pub total_l_extensions: usize,
    pub false_r_extensions: usize,
    pub false_l_extensions: usize,
}

impl ExtensionReport {
    #[must_use]
    pub fn new(input_file: impl Into<String>, clones_total: u64, counts: ExtensionCounts) -> Self {
        Self {
            input_file: input_file.into(),
            clones_total,
            total_r_extensions: counts.total_right,
            total_l_extensions: counts.total_left,
            false_r_extensions: counts.false_right,
            false_l_extensions: counts.false_left,
        }
    }

    /// Build the report from an alignments export and its assemble report
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or a row is malformed.
    pub fn from_files(alignments: &Path, assemble_report: &Path) -> Result<Self, AnalysisError> {
        let table = TsvTable::from_path(alignments)?;
        let counts = count_extensions(&table)?;
        let clones_total = parse_assemble_report(assemble_report)?;

        info!(
            rows = table.len(),
            left = counts.total_left,
            right = counts.total_right,
            false_left = counts.false_left,
            false_right = counts.false_right,
            "Counted extensions"
        );

        Ok(Self::new(alignments.display().to_string(), clones_total, counts))
    }
}
