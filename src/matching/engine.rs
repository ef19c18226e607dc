use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::clone::ObservedClone;
use crate::core::sample::Sample;
use crate::core::types::{Chain, MatchMode, SequenceField};
use crate::matching::tally::{tally, CloneTally};
use crate::parsing::{mixcr, samples, trust, truth, ParseError};
use crate::truth::{FuzzyGroundTruthIndex, IndexConfig, IndexError};

/// Default highest error budget tallied (levels 0 through 4)
pub const DEFAULT_MAX_ERRORS: u32 = 4;

#[derive(Error, Debug)]
pub enum ConcordanceError {
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to index ground truth: {0}")]
    Index(#[from] IndexError),

    #[error("Sample '{0}' not found among the STAR alignments")]
    UnknownSample(String),
}

fn load<T>(path: &Path, f: impl FnOnce(&Path) -> Result<T, ParseError>) -> Result<T, ConcordanceError> {
    f(path).map_err(|source| ConcordanceError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Assembler whose output is compared with the ground truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Assembler {
    Mixcr,
    Trust,
}

impl Assembler {
    pub const ALL: [Assembler; 2] = [Assembler::Mixcr, Assembler::Trust];

    /// Column prefix for flattened statistics
    #[must_use]
    pub fn prefix(self, field: SequenceField) -> String {
        let name = match self {
            Self::Mixcr => "mixcr",
            Self::Trust => "trust",
        };
        match field {
            SequenceField::Nucleotide => format!("{name}_"),
            SequenceField::AminoAcid => format!("{name}_aa_"),
        }
    }
}

impl std::fmt::Display for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mixcr => write!(f, "MiXCR"),
            Self::Trust => write!(f, "TRUST"),
        }
    }
}

/// Configuration for a concordance run over a simulation directory
#[derive(Debug, Clone)]
pub struct ConcordanceConfig {
    /// Simulation root holding the truth FASTA and the `star/`, `mixcr/` and `trust/` directories
    pub root: PathBuf,
    /// Chain whose truth FASTA is loaded and whose receptor selects MiXCR clones
    pub chain: Chain,
    /// Highest error budget tallied
    pub max_errors: u32,
    /// End-to-end or contained matching
    pub mode: MatchMode,
    /// CDR3 representations to compare, one tally each
    pub fields: Vec<SequenceField>,
    /// Restrict to these sample names; empty means every sample
    pub samples: Vec<String>,
    /// Index construction options
    pub index: IndexConfig,
}

impl Default for ConcordanceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            chain: Chain::default(),
            max_errors: DEFAULT_MAX_ERRORS,
            mode: MatchMode::EndToEnd,
            fields: vec![SequenceField::Nucleotide],
            samples: Vec::new(),
            index: IndexConfig::default(),
        }
    }
}

impl ConcordanceConfig {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, chain: Chain) -> Self {
        Self {
            root: root.into(),
            chain,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn star_dir(&self) -> PathBuf {
        self.root.join("star")
    }

    #[must_use]
    pub fn mixcr_dir(&self) -> PathBuf {
        self.root.join("mixcr")
    }

    #[must_use]
    pub fn trust_dir(&self) -> PathBuf {
        self.root.join("trust")
    }

    #[must_use]
    pub fn truth_path(&self) -> PathBuf {
        truth::truth_fasta_path(&self.root, &self.chain)
    }
}

/// Tally of one assembler's clones for one CDR3 field
#[derive(Debug, Clone, Serialize)]
pub struct AssemblerConcordance {
    pub assembler: Assembler,
    pub field: SequenceField,
    #[serde(flatten)]
    pub tally: CloneTally,
}

impl AssemblerConcordance {
    #[must_use]
    pub fn columns(&self) -> Vec<(String, usize)> {
        self.tally.columns(&self.assembler.prefix(self.field))
    }
}

/// Concordance results for one sample
#[derive(Debug, Clone, Serialize)]
pub struct SampleConcordance {
    #[serde(flatten)]
    pub sample: Sample,
    pub assemblers: Vec<AssemblerConcordance>,
}

/// Compares assembled clones from each sample with the simulated ground truth
pub struct ConcordanceEngine {
    config: ConcordanceConfig,
    indexes: Vec<(SequenceField, FuzzyGroundTruthIndex)>,
}

impl ConcordanceEngine {
    /// Load the truth FASTA and index every configured field
    ///
    /// # Errors
    ///
    /// Returns `ConcordanceError::Load` if the truth FASTA cannot be parsed, or
    /// `ConcordanceError::Index` if a truth sequence cannot be indexed.
    pub fn new(config: ConcordanceConfig) -> Result<Self, ConcordanceError> {
        let truth_path = config.truth_path();
        let records = load(&truth_path, truth::parse_truth_file)?;

        let indexes = config
            .fields
            .iter()
            .map(|&field| {
                FuzzyGroundTruthIndex::build_with_config(&records, field, &config.index)
                    .map(|index| (field, index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            truth = %truth_path.display(),
            records = records.len(),
            "Loaded ground truth"
        );

        Ok(Self { config, indexes })
    }

    #[must_use]
    pub fn config(&self) -> &ConcordanceConfig {
        &self.config
    }

    /// Samples found in the STAR directory, restricted to the configured names
    ///
    /// # Errors
    ///
    /// Returns `ConcordanceError::Load` if the directory cannot be read, or
    /// `ConcordanceError::UnknownSample` if a requested sample is absent.
    pub fn samples(&self) -> Result<Vec<Sample>, ConcordanceError> {
        let all = load(&self.config.star_dir(), samples::discover_samples)?;
        if self.config.samples.is_empty() {
            return Ok(all);
        }

        if let Some(missing) = self
            .config
            .samples
            .iter()
            .find(|name| !all.iter().any(|s| &s.sample_name == *name))
        {
            return Err(ConcordanceError::UnknownSample(missing.clone()));
        }

        Ok(all
            .into_iter()
            .filter(|s| self.config.samples.contains(&s.sample_name))
            .collect())
    }

    /// Tally a batch of clones against every configured field
    #[must_use]
    pub fn evaluate_clones(
        &self,
        assembler: Assembler,
        clones: &[ObservedClone],
    ) -> Vec<AssemblerConcordance> {
        self.indexes
            .iter()
            .map(|(field, index)| {
                let queries: Vec<&str> = clones.iter().map(|c| c.cdr3(*field)).collect();
                AssemblerConcordance {
                    assembler,
                    field: *field,
                    tally: tally(index, &queries, self.config.max_errors, self.config.mode),
                }
            })
            .collect()
    }

    /// Load one assembler's clones for a sample
    ///
    /// # Errors
    ///
    /// Returns `ConcordanceError::Load` if the assembler output cannot be parsed.
    pub fn load_clones(
        &self,
        assembler: Assembler,
        sample: &Sample,
    ) -> Result<Vec<ObservedClone>, ConcordanceError> {
        match assembler {
            Assembler::Mixcr => {
                let path = sample.mixcr_path(&self.config.mixcr_dir());
                let clones = load(&path, mixcr::parse_clones_file)?;
                let total = clones.len();
                let kept = mixcr::filter_by_receptor(clones, self.config.chain.receptor());
                debug!(
                    sample = %sample.sample_name,
                    total,
                    kept = kept.len(),
                    "Selected MiXCR clones by receptor"
                );
                Ok(kept)
            }
            Assembler::Trust => {
                let path = sample.trust_path(&self.config.trust_dir());
                load(&path, trust::parse_trust_file)
            }
        }
    }

    /// Compare every assembler's clones for one sample with the ground truth
    ///
    /// # Errors
    ///
    /// Returns `ConcordanceError::Load` if an assembler output cannot be parsed.
    pub fn evaluate_sample(&self, sample: &Sample) -> Result<SampleConcordance, ConcordanceError> {
        let mut assemblers = Vec::new();

        for assembler in Assembler::ALL {
            let clones = self.load_clones(assembler, sample)?;
            let results = self.evaluate_clones(assembler, &clones);

            for result in &results {
                if let Some(best) = result.tally.level(self.config.max_errors) {
                    info!(
                        sample = %sample.sample_name,
                        assembler = %assembler,
                        field = %result.field,
                        total = result.tally.total,
                        matched_clones = best.matched_clones,
                        unmatched_clones = best.unmatched_clones,
                        "Tallied clones"
                    );
                }
            }
            assemblers.extend(results);
        }

        Ok(SampleConcordance {
            sample: sample.clone(),
            assemblers,
        })
    }

    /// Evaluate every selected sample
    ///
    /// # Errors
    ///
    /// See [`ConcordanceEngine::samples`] and [`ConcordanceEngine::evaluate_sample`].
    pub fn run(&self) -> Result<Vec<SampleConcordance>, ConcordanceError> {
        let samples = self.samples()?;
        if samples.is_empty() {
            warn!(dir = %self.config.star_dir().display(), "No samples found");
        }

        samples.iter().map(|s| self.evaluate_sample(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GenomeBuild;
    use tempfile::TempDir;

    fn write(path: PathBuf, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn simulation_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        write(
            root.join("in_silico_TRB.fasta"),
            ">c1|TGTGCCAGCAGTTTAGC|CASSLA|x\nACGT\n>c2|TGCAGTGCTAGAGAC|CSARD|y\nACGT\n",
        );
        write(
            root.join("star/in_silico_RNA_Seq_50bp.hg37.paired.sorted.bam"),
            "",
        );
        write(
            root.join("mixcr/in_silico_RNA_Seq_50bp.paired.txt"),
            "allVHitsWithScore\tnSeqCDR3\taaSeqCDR3
TRBV5-1*00(100)\tTGTGCCAGCAGTTTAGC\tCASSLA
TRBV5-1*00(100)\tTGTGCCAGCAGTTTAGG\tCASSLG
IGHV3-23*00(100)\tTGTGCCAGCAGTTTAGC\tCASSLA
",
        );
        write(
            root.join("trust/in_silico_RNA_Seq_50bp.hg37.paired.sorted.bam.fa"),
            ">t1+1+a+b+TRBV20-1+TRBJ1-1+c+CSARD+d+TGCAGTGCTAGAGAC\nACGT\n",
        );
        dir
    }

    #[test]
    fn test_assembler_prefix() {
        assert_eq!(Assembler::Mixcr.prefix(SequenceField::Nucleotide), "mixcr_");
        assert_eq!(Assembler::Trust.prefix(SequenceField::AminoAcid), "trust_aa_");
    }

    #[test]
    fn test_config_paths() {
        let config = ConcordanceConfig::new("/sim", Chain::default());
        assert_eq!(config.star_dir(), PathBuf::from("/sim/star"));
        assert_eq!(config.truth_path(), PathBuf::from("/sim/in_silico_TRB.fasta"));
        assert_eq!(config.max_errors, DEFAULT_MAX_ERRORS);
    }

    #[test]
    fn test_run_over_simulation_root() {
        let root = simulation_root();
        let mut config = ConcordanceConfig::new(root.path(), Chain::default());
        config.max_errors = 1;

        let engine = ConcordanceEngine::new(config).unwrap();
        let results = engine.run().unwrap();
        assert_eq!(results.len(), 1);

        let sample = &results[0];
        assert_eq!(sample.sample.build, GenomeBuild::Hg37);
        assert_eq!(sample.assemblers.len(), 2);

        // IG clone is filtered out for a TRB run
        let mixcr = &sample.assemblers[0];
        assert_eq!(mixcr.assembler, Assembler::Mixcr);
        assert_eq!(mixcr.tally.total, 2);
        assert_eq!(mixcr.tally.level(0).unwrap().matched_records, 1);
        assert_eq!(mixcr.tally.level(1).unwrap().matched_records, 2);
        assert_eq!(mixcr.tally.level(1).unwrap().matched_clones, 1);

        let trust = &sample.assemblers[1];
        assert_eq!(trust.tally.total, 1);
        assert_eq!(trust.tally.level(0).unwrap().matched_clones, 1);
    }

    #[test]
    fn test_amino_acid_field() {
        let root = simulation_root();
        let mut config = ConcordanceConfig::new(root.path(), Chain::default());
        config.fields = vec![SequenceField::Nucleotide, SequenceField::AminoAcid];

        let engine = ConcordanceEngine::new(config).unwrap();
        let results = engine.run().unwrap();
        assert_eq!(results[0].assemblers.len(), 4);

        let mixcr_aa = &results[0].assemblers[1];
        assert_eq!(mixcr_aa.field, SequenceField::AminoAcid);
        assert_eq!(mixcr_aa.columns()[0].0, "mixcr_aa_total");
    }

    #[test]
    fn test_unknown_sample() {
        let root = simulation_root();
        let mut config = ConcordanceConfig::new(root.path(), Chain::default());
        config.samples = vec!["100bp.hg38.single".to_string()];

        let engine = ConcordanceEngine::new(config).unwrap();
        assert!(matches!(
            engine.run(),
            Err(ConcordanceError::UnknownSample(_))
        ));
    }

    #[test]
    fn test_missing_truth_file() {
        let dir = TempDir::new().unwrap();
        let config = ConcordanceConfig::new(dir.path(), Chain::default());
        assert!(matches!(
            ConcordanceEngine::new(config),
            Err(ConcordanceError::Load { .. })
        ));
    }
}
