use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::GenomeBuild;

/// Common prefix of every simulated sample file
pub const SAMPLE_PREFIX: &str = "in_silico_RNA_Seq_";

/// One simulated RNA-Seq sample, described by its STAR alignment file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// File stem without the `in_silico_RNA_Seq_` prefix
    pub sample_name: String,

    /// Whether V(D)J reads were spiked into the sample
    pub vdj: bool,

    /// Read length in bp
    #[serde(rename = "len")]
    pub read_length: u32,

    /// Reference the reads were aligned to
    #[serde(rename = "ref")]
    pub build: GenomeBuild,

    /// Paired-end (true) or single-end (false) input
    pub paired: bool,
}

impl Sample {
    fn vdj_infix(&self) -> &'static str {
        if self.vdj {
            ""
        } else {
            "no_VDJ_"
        }
    }

    fn layout(&self) -> &'static str {
        if self.paired {
            "paired"
        } else {
            "single"
        }
    }

    /// Path of the MiXCR clone table for this sample
    #[must_use]
    pub fn mixcr_path(&self, mixcr_dir: &Path) -> PathBuf {
        mixcr_dir.join(format!(
            "{SAMPLE_PREFIX}{}{}bp.{}.txt",
            self.vdj_infix(),
            self.read_length,
            self.layout()
        ))
    }

    /// Path of the TRUST contig FASTA for this sample
    #[must_use]
    pub fn trust_path(&self, trust_dir: &Path) -> PathBuf {
        trust_dir.join(format!(
            "{SAMPLE_PREFIX}{}{}bp.{}.{}.sorted.bam.fa",
            self.vdj_infix(),
            self.read_length,
            self.build,
            self.layout()
        ))
    }
}
