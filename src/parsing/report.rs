use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::ParseError;

static CLONOTYPE_READS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Reads used in clonotypes, percent of total: ([0-9]+)")
        .expect("valid assemble report regex")
});

/// Read the clonotype read figure from a MiXCR assemble report
///
/// Returns the integer part of the first `Reads used in clonotypes, percent of
/// total:` line, or 0 when the report has no such line.
///
/// # Errors
///
/// Returns `ParseError::Io` if the report cannot be read.
pub fn parse_assemble_report(path: &Path) -> Result<u64, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_assemble_report_reader(BufReader::new(file))
}

/// Read the clonotype read figure from report text
///
/// # Errors
///
/// Returns `ParseError::Io` if a line cannot be read.
pub fn parse_assemble_report_reader<R: BufRead>(reader: R) -> Result<u64, ParseError> {
    for line in reader.lines() {
        let line = line?;
        if let Some(caps) = CLONOTYPE_READS.captures(&line) {
            return caps[1].parse::<u64>().map_err(|e| {
                ParseError::InvalidFormat(format!("Invalid clonotype read count '{}': {e}", &caps[1]))
            });
        }
    }
    Ok(0)
}
