//! Totals and maxima over many per-run reports.
//!
//! Each run appends one JSON line to a results file; the run's simulation
//! parameters are encoded in its input file name as
//! `clones<N>_coverage<N>_length<N>_seq<NAME>`.

use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::analysis::extensions::ExtensionReport;
use crate::analysis::overlaps::OverlapReport;
use crate::analysis::AnalysisError;
use crate::utils::stats::{nan_max, ratio};

static RUN_PARAMETERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"clones([0-9]+)_coverage([0-9]+)_length([0-9]+)_seq([^_]+)")
        .expect("valid run parameters regex")
});

/// Default upper bound on clone count for the small-repertoire maxima
pub const DEFAULT_MAX_CLONES: u64 = 1000;

/// Simulation parameters of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunParameters {
    pub clones: u64,
    pub coverage: u64,
    pub length: u64,
    pub sequencer: String,
}

impl RunParameters {
    /// Parse from anywhere in a file name; `None` if the pattern is absent
    #[must_use]
    pub fn parse(input_file: &str) -> Option<Self> {
        let caps = RUN_PARAMETERS.captures(input_file)?;
        Some(Self {
            clones: caps[1].parse().ok()?,
            coverage: caps[2].parse().ok()?,
            length: caps[3].parse().ok()?,
            sequencer: caps[4].to_string(),
        })
    }
}

/// Read one JSON value per non-blank line
///
/// # Errors
///
/// Returns `AnalysisError::Json` with the 1-based line number if a line does
/// not deserialize.
pub fn read_json_lines<T: DeserializeOwned, R: BufRead>(reader: R) -> Result<Vec<T>, AnalysisError> {
    let mut values = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(&line).map_err(|source| AnalysisError::Json { line: i + 1, source })?;
        values.push(value);
    }
    Ok(values)
}

/// [`read_json_lines`] over a file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a line is invalid.
pub fn read_json_lines_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AnalysisError> {
    let file = std::fs::File::open(path)?;
    read_json_lines(std::io::BufReader::new(file))
}

/// Extension totals over every run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSummary {
    pub runs: usize,
    pub total_extensions: u64,
    pub false_extensions: u64,
    /// Percent of extensions that were false; NaN when there were none
    pub false_percent: f64,
}

impl ExtensionSummary {
    #[must_use]
    pub fn from_reports(reports: &[ExtensionReport]) -> Self {
        let total_extensions: u64 = reports
            .iter()
            .map(|r| (r.total_l_extensions + r.total_r_extensions) as u64)
            .sum();
        let false_extensions: u64 = reports
            .iter()
            .map(|r| (r.false_l_extensions + r.false_r_extensions) as u64)
            .sum();

        Self {
            runs: reports.len(),
            total_extensions,
            false_extensions,
            false_percent: 100.0 * ratio(false_extensions, total_extensions),
        }
    }
}

impl fmt::Display for ExtensionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total extension number: {}", self.total_extensions)?;
        writeln!(f, "False-extension number: {}", self.false_extensions)?;
        write!(f, "False-extension percent total: {:.4}%", self.false_percent)
    }
}

/// Bad-overlap rates of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapRates {
    /// Overlaps producing a new CDR3 per overlap
    pub bad: f64,
    /// Distinct new CDR3s per clone
    pub bad_diversity: f64,
    /// Distinct high-quality new CDR3s per clone
    pub bad_diversity_hq: f64,
}

impl OverlapRates {
    #[must_use]
    pub fn of(report: &OverlapReport) -> Self {
        Self {
            bad: ratio(report.overlaps_producing_new_cdr3 as u64, report.total_overlaps as u64),
            bad_diversity: ratio(report.new_cdr3_diversity as u64, report.clones_total),
            bad_diversity_hq: ratio(report.hq_new_cdr3_diversity as u64, report.clones_total),
        }
    }
}

/// Maxima of the bad-overlap rates over a group of runs, as percentages
///
/// NaN rates are skipped; a group with no finite rate reports NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapMaxima {
    pub percent_bad: f64,
    pub percent_bad_diversity: f64,
    pub percent_bad_diversity_hq: f64,
}

impl OverlapMaxima {
    fn over(rates: &[OverlapRates]) -> Self {
        Self {
            percent_bad: 100.0 * nan_max(rates.iter().map(|r| r.bad)),
            percent_bad_diversity: 100.0 * nan_max(rates.iter().map(|r| r.bad_diversity)),
            percent_bad_diversity_hq: 100.0 * nan_max(rates.iter().map(|r| r.bad_diversity_hq)),
        }
    }
}

/// Bad-overlap maxima for small repertoires and for all runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapSummary {
    pub runs: usize,
    pub max_clones: u64,
    /// Runs whose file name gives at most `max_clones` clones
    pub small: OverlapMaxima,
    pub all: OverlapMaxima,
}

impl OverlapSummary {
    /// Runs without parameters in their file name count towards `all` only
    #[must_use]
    pub fn from_reports(reports: &[OverlapReport], max_clones: u64) -> Self {
        let all: Vec<OverlapRates> = reports.iter().map(OverlapRates::of).collect();
        let small: Vec<OverlapRates> = reports
            .iter()
            .zip(&all)
            .filter(|(report, _)| {
                RunParameters::parse(&report.input_file).is_some_and(|p| p.clones <= max_clones)
            })
            .map(|(_, rates)| *rates)
            .collect();

        Self {
            runs: reports.len(),
            max_clones,
            small: OverlapMaxima::over(&small),
            all: OverlapMaxima::over(&all),
        }
    }
}

impl fmt::Display for OverlapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.max_clones;
        writeln!(f, "Bad overlaps in runs with <= {n} clones: {:.3}%", self.small.percent_bad)?;
        writeln!(
            f,
            "Bad overlap diversity in runs with <= {n} clones: {:.3}%",
            self.small.percent_bad_diversity
        )?;
        writeln!(
            f,
            "Bad overlap high quality diversity in runs with <= {n} clones: {:.3}%",
            self.small.percent_bad_diversity_hq
        )?;
        writeln!(f, "Bad overlaps: {:.3}%", self.all.percent_bad)?;
        writeln!(f, "Bad overlaps diversity: {:.3}%", self.all.percent_bad_diversity)?;
        write!(
            f,
            "Bad overlaps high quality diversity: {:.3}%",
            self.all.percent_bad_diversity_hq
        )
    }
}
