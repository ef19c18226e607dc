//! Parser for TRUST contig FASTA output.
//!
//! Lines starting with `#` are comments. Each `>` header is a `+`-separated
//! list whose fields 4 and 5 hold the V and J genes, field 7 the amino-acid
//! CDR3 and field 9 the nucleotide CDR3; the line after a header is the contig.

use std::path::Path;

use crate::core::clone::ObservedClone;
use crate::parsing::ParseError;

const V_FIELD: usize = 4;
const J_FIELD: usize = 5;
const AA_FIELD: usize = 7;
const NT_FIELD: usize = 9;

/// Parse a TRUST contig FASTA file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a header has too few fields.
pub fn parse_trust_file(path: &Path) -> Result<Vec<ObservedClone>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_trust_text(&content)
}

/// Parse TRUST contig FASTA text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a header has fewer than 10 fields.
pub fn parse_trust_text(text: &str) -> Result<Vec<ObservedClone>, ParseError> {
    let mut clones = Vec::new();
    let mut prev: Option<(usize, &str)> = None;

    for (i, line) in text.lines().enumerate() {
        if line.starts_with('#') {
            continue;
        }

        if let Some((header_line, header)) = prev.and_then(|(n, p)| Some((n, p.strip_prefix('>')?))) {
            let fields: Vec<&str> = header.split('+').collect();
            if fields.len() <= NT_FIELD {
                return Err(ParseError::InvalidFormat(format!(
                    "TRUST header on line {} has {} '+'-separated fields, expected at least {}",
                    header_line + 1,
                    fields.len(),
                    NT_FIELD + 1
                )));
            }

            clones.push(
                ObservedClone::new(fields[NT_FIELD], fields[AA_FIELD])
                    .with_v_hits(fields[V_FIELD])
                    .with_j_hits(fields[J_FIELD])
                    .with_contig(line),
            );
        }

        prev = Some((i, line));
    }

    Ok(clones)
}
