//! End-to-end tests driving the `vdj-assess` binary on small fixture files.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TRUTH: &str = ">c1|TGTGCCAGCAGTTTAGC|CASSLA|sim
ACGT
>c2|TGCAGTGCTAGAGAC|CSARD|sim
ACGT
>c3|TGTGCCAGCAGTTTAGC|CASSLA|dup
ACGT
";

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn cmd() -> Command {
    Command::cargo_bin("vdj-assess").unwrap()
}

fn simulation_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(&root.join("in_silico_TRB.fasta"), TRUTH);
    write(&root.join("star/in_silico_RNA_Seq_50bp.hg38.paired.sorted.bam"), "");
    write(&root.join("star/in_silico_RNA_Seq_no_VDJ_50bp.hg38.paired.sorted.bam"), "");
    write(&root.join("star/notes.txt"), "");

    let mixcr = "allVHitsWithScore\tallJHitsWithScore\tnSeqCDR3\taaSeqCDR3
TRBV5-1*00(100)\tTRBJ2-7*00(50)\tTGTGCCAGCAGTTTAGC\tCASSLA
TRBV20-1*00(100)\tTRBJ1-1*00(50)\tTGCAGTGCTAGAGAT\tCSARD
IGHV3-23*00(100)\tIGHJ4*00(50)\tTGTGCCAGCAGTTTAGC\tCASSLA
";
    write(&root.join("mixcr/in_silico_RNA_Seq_50bp.paired.txt"), mixcr);
    write(
        &root.join("mixcr/in_silico_RNA_Seq_no_VDJ_50bp.paired.txt"),
        "allVHitsWithScore\tnSeqCDR3\taaSeqCDR3\n",
    );

    write(
        &root.join("trust/in_silico_RNA_Seq_50bp.hg38.paired.sorted.bam.fa"),
        ">t1+1+a+b+TRBV5-1+TRBJ2-7+c+CASSLA+d+TGTGCCAGCAGTTTAGC\nACGT\n",
    );
    write(
        &root.join("trust/in_silico_RNA_Seq_no_VDJ_50bp.hg38.paired.sorted.bam.fa"),
        "# no contigs\n",
    );

    dir
}

#[test]
fn test_lookup_text() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.fasta");
    write(&truth, TRUTH);

    cmd()
        .args(["lookup", truth.to_str().unwrap(), "TGTGCCAGCAGTTTAGC", "TGTGCCAGCAGTTTAGG"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TGTGCCAGCAGTTTAGC\tc1 (0 errors)"))
        .stdout(predicate::str::contains("TGTGCCAGCAGTTTAGG\tno match"));
}

#[test]
fn test_lookup_json_with_budget() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.fasta");
    write(&truth, TRUTH);

    let output = cmd()
        .args(["-f", "json", "lookup", truth.to_str().unwrap(), "TGTGCCAGCAGTTTAGG", "-k", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["id"], "c1");
    assert_eq!(json[0]["errors"], 1);
}

#[test]
fn test_lookup_contained_amino_acid() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.fasta");
    write(&truth, TRUTH);
    let queries = dir.path().join("queries.txt");
    write(&queries, "XXCASSLAXX\n\nCSARD\n");

    cmd()
        .args(["-f", "tsv", "lookup", truth.to_str().unwrap()])
        .args(["--field", "aa", "--mode", "contained", "--input", queries.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("query\tid\tsequence\terrors\n"))
        .stdout(predicate::str::contains("XXCASSLAXX\tc1\tCASSLA\t0"))
        .stdout(predicate::str::contains("CSARD\tc2\tCSARD\t0"));
}

#[test]
fn test_lookup_requires_queries() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.fasta");
    write(&truth, TRUTH);

    cmd()
        .args(["lookup", truth.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No query sequences"));
}

#[test]
fn test_concordance_tsv() {
    let root = simulation_root();

    let output = cmd()
        .args(["-f", "tsv", "concordance", "--root", root.path().to_str().unwrap(), "-k", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);

    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(&header[..5], &["sample_name", "vdj", "len", "ref", "paired"]);
    let column = |name: &str| header.iter().position(|h| *h == name).unwrap();

    // Samples are sorted by file name
    let vdj: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(vdj[0], "50bp.hg38.paired");
    assert_eq!(vdj[column("mixcr_total")], "2");
    assert_eq!(vdj[column("mixcr_matched_records_0")], "1");
    assert_eq!(vdj[column("mixcr_matched_records_1")], "2");
    assert_eq!(vdj[column("mixcr_matched_clones_1")], "2");
    assert_eq!(vdj[column("mixcr_unmatched_clones_0")], "1");
    assert_eq!(vdj[column("trust_matched_clones_0")], "1");

    let no_vdj: Vec<&str> = lines[2].split('\t').collect();
    assert_eq!(no_vdj[1], "false");
    assert_eq!(no_vdj[column("mixcr_total")], "0");
    assert_eq!(no_vdj[column("trust_total")], "0");
}

#[test]
fn test_concordance_json_sample_filter() {
    let root = simulation_root();

    let output = cmd()
        .args(["-f", "json", "concordance", "-r", root.path().to_str().unwrap()])
        .args(["--sample", "50bp.hg38.paired", "--field", "nt", "--field", "aa"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let samples = json.as_array().unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0]["sample_name"], "50bp.hg38.paired");
    assert_eq!(samples[0]["ref"], "hg38");
    assert_eq!(samples[0]["assemblers"].as_array().unwrap().len(), 4);
}

#[test]
fn test_concordance_unknown_sample() {
    let root = simulation_root();

    cmd()
        .args(["concordance", "-r", root.path().to_str().unwrap(), "-s", "75bp.hg37.single"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("75bp.hg37.single"));
}

#[test]
fn test_concordance_missing_truth() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["concordance", "-r", dir.path().to_str().unwrap(), "--chain", "igh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("in_silico_IGH.fasta"));
}

const ASSEMBLE_REPORT: &str = "Analysis date: today
Final clonotype count: 12
Reads used in clonotypes, percent of total: 1234 (56.7%)
";

#[test]
fn test_extensions_json_line_feeds_summary() {
    let dir = TempDir::new().unwrap();
    let points = ":::::::::0:::::::::12:::";
    let alignments = dir.path().join("clones100_coverage5_length100_seqMiSeq_alignments.tsv");
    write(
        &alignments,
        &format!(
            "descrR1\trefPoints\treadSequence\ttargetDescriptions
r|TGTGCCAGCAGT|x\t{points}\tTGTGCCAGCAGT\tLExtended(3) + [9] + RExtended(3)
r|TGTGCCAGCAGT|x\t{points},{points}\tAGTGCCAGCAGA,TGTGCCAGCAGT\tLExtended(3) + [9] + RExtended(3),V
"
        ),
    );
    let report = dir.path().join("assemble.report");
    write(&report, ASSEMBLE_REPORT);

    let output = cmd()
        .args(["-f", "json", "extensions", alignments.to_str().unwrap(), report.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["clonesTotal"], 1234);
    assert_eq!(json["totalLExtensions"], 2);
    assert_eq!(json["falseRExtensions"], 1);

    let results = dir.path().join("extensions.jsonl");
    write(&results, &format!("{stdout}{stdout}"));

    cmd()
        .args(["extension-summary", results.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total extension number: 8"))
        .stdout(predicate::str::contains("False-extension number: 4"))
        .stdout(predicate::str::contains("False-extension percent total: 50.0000%"));
}

#[test]
fn test_extensions_missing_column() {
    let dir = TempDir::new().unwrap();
    let alignments = dir.path().join("alignments.tsv");
    write(&alignments, "descrR1\treadSequence\nr|A|x\tA\n");
    let report = dir.path().join("assemble.report");
    write(&report, ASSEMBLE_REPORT);

    cmd()
        .args(["extensions", alignments.to_str().unwrap(), report.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refPoints"));
}

#[test]
fn test_overlaps_and_summary() {
    let dir = TempDir::new().unwrap();
    let reads = dir.path().join("reads.tsv");
    write(
        &reads,
        "readId\tdescrR1
1\tGClone|CASSA|x
2\tGClone|CASSA|x
3\tGClone|CASSB|x
",
    );
    let overlapped = dir.path().join("clones100_coverage5_length100_seqMiSeq_overlapped.tsv");
    write(
        &overlapped,
        "targetDescriptions\tnSeqCDR3\tminQualCDR3
VJOverlap(10) = L1.0 + R2.1\tCASSA\t30
VJOverlap(10) = [x]L1.0 + R3.1\tCASSX\t30
V + J\t\t
",
    );
    let report = dir.path().join("assemble.report");
    write(&report, "no clonotype line\n");

    let output = cmd()
        .args(["-f", "json", "overlaps"])
        .args([reads.to_str().unwrap(), overlapped.to_str().unwrap(), report.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["clonesTotal"], 0);
    assert_eq!(json["totalAlignments"], 3);
    assert_eq!(json["totalAlignmentsWithCDR3"], 2);
    assert_eq!(json["totalOverlaps"], 2);
    assert_eq!(json["correctOverlaps"], 1);
    assert_eq!(json["overlapsProducingNewCDR3"], 1);

    let results = dir.path().join("overlaps.jsonl");
    write(&results, &stdout);

    cmd()
        .args(["overlap-summary", results.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bad overlaps in runs with <= 1000 clones: 50.000%"))
        .stdout(predicate::str::contains("Bad overlaps: 50.000%"));
}

#[test]
fn test_summary_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("bad.jsonl");
    write(&results, "{\"inputFile\": \"x\"}\n");

    cmd()
        .args(["overlap-summary", results.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}
