use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::clone::ObservedClone;
use crate::core::types::{Receptor, SequenceField};
use crate::parsing::table::{field, non_empty_field, TsvTable};
use crate::parsing::ParseError;

static TCR_V_HIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TR[ABDG]V").expect("valid TCR V hit regex"));

static IG_V_HIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^IG[HKL]V").expect("valid IG V hit regex"));

/// Whether the top V hit belongs to the given receptor family
#[must_use]
pub fn is_receptor_hit(v_hits: &str, receptor: Receptor) -> bool {
    match receptor {
        Receptor::Tcr => TCR_V_HIT.is_match(v_hits),
        Receptor::Ig => IG_V_HIT.is_match(v_hits),
    }
}

/// Parse a MiXCR clone table
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::MissingColumn` if a required column is absent.
pub fn parse_clones_file(path: &Path) -> Result<Vec<ObservedClone>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_clones_reader(file)
}

/// Parse a MiXCR clone table from any reader
///
/// Requires `allVHitsWithScore`, `nSeqCDR3` and `aaSeqCDR3`; `allJHitsWithScore`
/// is read when present.
///
/// # Errors
///
/// Returns `ParseError::Csv` on unreadable rows, or `ParseError::MissingColumn`
/// if a required column is absent.
pub fn parse_clones_reader<R: Read>(reader: R) -> Result<Vec<ObservedClone>, ParseError> {
    let table = TsvTable::from_reader(reader)?;
    let v_col = table.column("allVHitsWithScore")?;
    let nt_col = table.column(SequenceField::Nucleotide.column())?;
    let aa_col = table.column(SequenceField::AminoAcid.column())?;
    let j_col = table.optional_column("allJHitsWithScore");

    let clones = table
        .records()
        .iter()
        .map(|record| {
            let mut clone = ObservedClone::new(field(record, nt_col), field(record, aa_col));
            clone.v_hits = non_empty_field(record, v_col).map(str::to_string);
            clone.j_hits = j_col
                .and_then(|col| non_empty_field(record, col))
                .map(str::to_string);
            clone
        })
        .collect();

    Ok(clones)
}

/// Keep only clones whose top V hit belongs to `receptor`
#[must_use]
pub fn filter_by_receptor(clones: Vec<ObservedClone>, receptor: Receptor) -> Vec<ObservedClone> {
    clones
        .into_iter()
        .filter(|clone| {
            clone
                .v_hits
                .as_deref()
                .is_some_and(|hits| is_receptor_hit(hits, receptor))
        })
        .collect()
}
