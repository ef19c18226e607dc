use serde::{Deserialize, Serialize};

/// Which CDR3 representation a lookup runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SequenceField {
    /// Nucleotide CDR3 (`nSeqCDR3`)
    #[default]
    Nucleotide,
    /// Amino-acid CDR3 (`aaSeqCDR3`)
    AminoAcid,
}

impl SequenceField {
    /// Column name used by MiXCR-style tables for this field
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Nucleotide => "nSeqCDR3",
            Self::AminoAcid => "aaSeqCDR3",
        }
    }
}

impl std::fmt::Display for SequenceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nucleotide => write!(f, "nt"),
            Self::AminoAcid => write!(f, "aa"),
        }
    }
}

/// How a query is compared with a truth sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The whole query aligns to the whole truth sequence
    #[default]
    EndToEnd,
    /// The trimmed core of the truth sequence occurs somewhere in the query
    Contained,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndToEnd => write!(f, "end-to-end"),
            Self::Contained => write!(f, "contained"),
        }
    }
}

/// Receptor family, used to select clones by their top V hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receptor {
    /// T-cell receptor (TRA/TRB/TRD/TRG)
    Tcr,
    /// Immunoglobulin (IGH/IGK/IGL)
    Ig,
}

/// Immunological chain of a simulated repertoire (TRB, IGH, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain(String);

impl Chain {
    /// Parse a chain name, normalizing to uppercase
    ///
    /// Returns `None` for names that are not a TR or IG chain.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let valid = matches!(
            upper.as_str(),
            "TRA" | "TRB" | "TRD" | "TRG" | "IGH" | "IGK" | "IGL"
        );
        valid.then_some(Self(upper))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn receptor(&self) -> Receptor {
        if self.0.starts_with("IG") {
            Receptor::Ig
        } else {
            Receptor::Tcr
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self("TRB".to_string())
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown chain '{s}' (expected one of TRA, TRB, TRD, TRG, IGH, IGK, IGL)")
        })
    }
}

/// Genome build the simulated reads were aligned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenomeBuild {
    Hg37,
    Hg38,
}

impl GenomeBuild {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hg37" => Some(Self::Hg37),
            "hg38" => Some(Self::Hg38),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hg37 => write!(f, "hg37"),
            Self::Hg38 => write!(f, "hg38"),
        }
    }
}
