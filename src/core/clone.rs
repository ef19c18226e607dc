use serde::{Deserialize, Serialize};

use crate::core::types::SequenceField;

/// A simulated clone from the in-silico ground truth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthRecord {
    /// Identifier taken from the first `|`-separated header field
    pub id: String,

    /// Nucleotide CDR3
    pub nt_cdr3: String,

    /// Amino-acid CDR3
    pub aa_cdr3: String,
}

impl TruthRecord {
    pub fn new(
        id: impl Into<String>,
        nt_cdr3: impl Into<String>,
        aa_cdr3: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            nt_cdr3: nt_cdr3.into(),
            aa_cdr3: aa_cdr3.into(),
        }
    }

    #[must_use]
    pub fn cdr3(&self, field: SequenceField) -> &str {
        match field {
            SequenceField::Nucleotide => &self.nt_cdr3,
            SequenceField::AminoAcid => &self.aa_cdr3,
        }
    }
}

/// A clone reported by an assembler (MiXCR or TRUST)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ObservedClone {
    /// V gene hits as reported (e.g. `TRBV5-1*00(1234)`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_hits: Option<String>,

    /// J gene hits as reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub j_hits: Option<String>,

    /// Nucleotide CDR3
    pub nt_cdr3: String,

    /// Amino-acid CDR3
    pub aa_cdr3: String,

    /// Assembled contig, when the assembler reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contig: Option<String>,
}

impl ObservedClone {
    pub fn new(nt_cdr3: impl Into<String>, aa_cdr3: impl Into<String>) -> Self {
        Self {
            nt_cdr3: nt_cdr3.into(),
            aa_cdr3: aa_cdr3.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_v_hits(mut self, v_hits: impl Into<String>) -> Self {
        self.v_hits = Some(v_hits.into());
        self
    }

    #[must_use]
    pub fn with_j_hits(mut self, j_hits: impl Into<String>) -> Self {
        self.j_hits = Some(j_hits.into());
        self
    }

    #[must_use]
    pub fn with_contig(mut self, contig: impl Into<String>) -> Self {
        self.contig = Some(contig.into());
        self
    }

    #[must_use]
    pub fn cdr3(&self, field: SequenceField) -> &str {
        match field {
            SequenceField::Nucleotide => &self.nt_cdr3,
            SequenceField::AminoAcid => &self.aa_cdr3,
        }
    }
}
