use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::sample::{Sample, SAMPLE_PREFIX};
use crate::core::types::GenomeBuild;
use crate::parsing::ParseError;

static SAMPLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"in_silico_RNA_Seq_*([a-zA-Z_]*)_([0-9]+)bp\.(hg3[78])\.([a-z]+)")
        .expect("valid sample name regex")
});

/// Parse sample parameters from a STAR alignment file name
///
/// Names look like `in_silico_RNA_Seq_[no_VDJ_]<len>bp.<hg37|hg38>.<paired|single>[.sorted].bam`.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the name does not end in `.bam` or does
/// not encode the sample parameters.
pub fn parse_bam_file_name(file_name: &str) -> Result<Sample, ParseError> {
    if !file_name.ends_with(".bam") {
        return Err(ParseError::InvalidFormat(format!(
            "'{file_name}' is not a BAM file name"
        )));
    }

    let stem = file_name.replace(".bam", "").replace(".sorted", "");

    let invalid = || ParseError::InvalidFormat(format!("Cannot parse sample from '{file_name}'"));
    let caps = SAMPLE_NAME.captures(&stem).ok_or_else(invalid)?;

    let read_length = caps[2].parse::<u32>().map_err(|_| invalid())?;
    let build = GenomeBuild::parse(&caps[3]).ok_or_else(invalid)?;

    Ok(Sample {
        sample_name: stem.replace(SAMPLE_PREFIX, ""),
        vdj: caps[1].is_empty(),
        read_length,
        build,
        paired: &caps[4] == "paired",
    })
}

/// Parse every BAM file name in the STAR output directory, sorted by name
///
/// # Errors
///
/// Returns `ParseError::Io` if the directory cannot be listed, or
/// `ParseError::InvalidFormat` for a BAM whose name cannot be parsed.
pub fn discover_samples(star_dir: &Path) -> Result<Vec<Sample>, ParseError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(star_dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.ends_with(".bam") {
            names.push(name);
        }
    }
    names.sort();

    let samples = names
        .iter()
        .map(|name| parse_bam_file_name(name))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(dir = %star_dir.display(), samples = samples.len(), "Discovered samples");
    Ok(samples)
}
