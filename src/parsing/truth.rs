//! Parser for the in-silico ground-truth FASTA.
//!
//! Each simulated clone is written as a FASTA record whose definition line
//! carries `|`-separated fields: an identifier, the nucleotide CDR3 and the
//! amino-acid CDR3, optionally followed by further fields. Both uncompressed
//! and gzip-compressed files are supported.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use noodles::fasta;
use tracing::debug;

use crate::core::clone::TruthRecord;
use crate::core::types::Chain;
use crate::parsing::ParseError;

/// Location of the truth FASTA for a chain under the simulation root
#[must_use]
pub fn truth_fasta_path(root: &Path, chain: &Chain) -> PathBuf {
    root.join(format!("in_silico_{chain}.fasta"))
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Parse a truth FASTA file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// a record is malformed, or `ParseError::InvalidFormat` if a definition line
/// lacks the CDR3 fields or the file holds no records.
pub fn parse_truth_file(path: &Path) -> Result<Vec<TruthRecord>, ParseError> {
    let file = std::fs::File::open(path)?;
    let records = if is_gzipped(path) {
        let mut reader = fasta::io::Reader::new(BufReader::new(GzDecoder::new(file)));
        parse_truth_reader(&mut reader)?
    } else {
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        parse_truth_reader(&mut reader)?
    };

    debug!(path = %path.display(), records = records.len(), "Loaded truth FASTA");
    Ok(records)
}

/// Parse truth records from a noodles FASTA reader
///
/// noodles splits the definition line at its first whitespace run, so the
/// line is rebuilt with a single space between name and description. An id
/// containing a tab or several spaces comes back with one space in their place.
fn parse_truth_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<TruthRecord>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name = String::from_utf8_lossy(record.name());
        let definition = match record.description() {
            Some(description) => format!("{name} {}", String::from_utf8_lossy(description)),
            None => name.into_owned(),
        };

        records.push(parse_truth_definition(&definition)?);
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No records found in truth FASTA".to_string(),
        ));
    }

    Ok(records)
}

/// Parse a definition line (without the leading `>`) into a truth record
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if fewer than three `|`-separated fields
/// are present.
pub fn parse_truth_definition(definition: &str) -> Result<TruthRecord, ParseError> {
    let definition = definition.strip_prefix('>').unwrap_or(definition).trim_end();
    let fields: Vec<&str> = definition.split('|').collect();

    if fields.len() < 3 {
        return Err(ParseError::InvalidFormat(format!(
            "Truth record '{definition}' has fewer than 3 '|'-separated fields"
        )));
    }

    Ok(TruthRecord::new(fields[0], fields[1], fields[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_truth_definition() {
        let record = parse_truth_definition("GClone|TGTGCCAGCAGTTTAGC|CASSLA|TRBV5-1|TRBJ2-7").unwrap();
        assert_eq!(record.id, "GClone");
        assert_eq!(record.nt_cdr3, "TGTGCCAGCAGTTTAGC");
        assert_eq!(record.aa_cdr3, "CASSLA");
    }

    #[test]
    fn test_parse_truth_definition_with_marker() {
        let record = parse_truth_definition(">clone7|ACGTAC|TY\n").unwrap();
        assert_eq!(record.id, "clone7");
        assert_eq!(record.aa_cdr3, "TY");
    }

    #[test]
    fn test_parse_truth_definition_missing_fields() {
        assert!(matches!(
            parse_truth_definition("clone7|ACGTAC"),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_truth_fasta_path() {
        let chain = Chain::parse("trb").unwrap();
        assert_eq!(
            truth_fasta_path(Path::new("/sim"), &chain),
            PathBuf::from("/sim/in_silico_TRB.fasta")
        );
    }

    #[test]
    fn test_parse_truth_file() {
        let content = b">c1|TGTGCCAGCAGTTTAGC|CASSLA|x\nACGTACGT\n>c2|TGTGCCAGCAGCCCAGC|CASSPA|y\nGGGG\n";

        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();

        let records = parse_truth_file(temp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "c1");
        assert_eq!(records[1].nt_cdr3, "TGTGCCAGCAGCCCAGC");
        assert_eq!(records[1].aa_cdr3, "CASSPA");
    }

    #[test]
    fn test_parse_truth_file_with_spaces_in_definition() {
        let content = b">c1 sim|ACGTACGTAC|TYV|note\nACGT\n";

        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();

        let records = parse_truth_file(temp.path()).unwrap();
        assert_eq!(records[0].id, "c1 sim");
        assert_eq!(records[0].nt_cdr3, "ACGTACGTAC");
    }

    #[test]
    fn test_parse_truth_file_collapses_name_separator() {
        let content = b">c1\tsim|ACGTACGTAC|TYV|note\nACGT\n>c2   sim|GGGTTT|GF\nACGT\n";

        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();

        let records = parse_truth_file(temp.path()).unwrap();
        assert_eq!(records[0].id, "c1 sim");
        assert_eq!(records[0].aa_cdr3, "TYV");
        assert_eq!(records[1].id, "c2 sim");
        assert_eq!(records[1].nt_cdr3, "GGGTTT");
    }

    #[test]
    fn test_parse_empty_truth_file() {
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(b"").unwrap();
        temp.flush().unwrap();

        assert!(parse_truth_file(temp.path()).is_err());
    }
}
