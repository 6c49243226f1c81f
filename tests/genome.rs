use std::path::Path;

use kmer_frames::frame::Frame;
use kmer_frames::genome::{Genome, GenomeDirectory, GenomeError};
use kmer_frames::locations::Strand;

fn write_genome(dir: &Path, stem: &str, fasta: &str, features: &str) {
    std::fs::write(dir.join(format!("{stem}.fna")), fasta).unwrap();
    std::fs::write(dir.join(format!("{stem}.features.tsv")), features).unwrap();
}

const FASTA: &str = ">c1 test contig\nAAACCCGGGTTTAAA\n>c2\nacgtacgt\n";
const FEATURES: &str = "\
# comment lines and blanks are skipped

c1\t+\t4-12
c2\t-\t1-4,6-8
";

#[test]
fn test_load_genome() {
    let dir = tempfile::tempdir().unwrap();
    write_genome(dir.path(), "g1", FASTA, FEATURES);

    let genome = Genome::load(
        &dir.path().join("g1.fna"),
        &dir.path().join("g1.features.tsv"),
    )
    .unwrap();

    assert_eq!(genome.id(), "g1");
    assert_eq!(genome.contigs().len(), 2);
    // sequences are normalized to lower case
    assert_eq!(genome.sequence("c1"), Some(&b"aaacccgggtttaaa"[..]));
    assert_eq!(genome.sequence("c2"), Some(&b"acgtacgt"[..]));
    assert_eq!(genome.sequence("c3"), None);

    assert_eq!(genome.features().len(), 2);
    let f1 = &genome.features()[0];
    assert_eq!(f1.contig_id(), "c1");
    assert_eq!(f1.strand(), Strand::Plus);
    assert_eq!((f1.left(), f1.right()), (4, 12));
    let f2 = &genome.features()[1];
    assert_eq!(f2.strand(), Strand::Minus);
    assert!(f2.is_segmented());
}

#[test]
fn test_coding_map() {
    let dir = tempfile::tempdir().unwrap();
    write_genome(dir.path(), "g1", FASTA, FEATURES);
    let genome = Genome::load(
        &dir.path().join("g1.fna"),
        &dir.path().join("g1.features.tsv"),
    )
    .unwrap();

    let map = genome.coding_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["c1"].compute_region_frame(4, 6), Frame::P0);
    // the segmented feature on c2 was folded in as invalid
    assert_eq!(map["c2"].compute_region_frame(2, 4), Frame::XX);
}

#[test]
fn test_bad_feature_lines() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        "c1\t*\t4-12",    // bad strand
        "c1\t+\t12-4",    // left past right
        "c1\t+\t0-12",    // positions are 1-based
        "c1\t+\tfour-12", // unparsable number
        "c1\t+",          // missing region list
    ];
    for (i, case) in cases.iter().enumerate() {
        let stem = format!("g{i}");
        write_genome(dir.path(), &stem, FASTA, case);
        let result = Genome::load(
            &dir.path().join(format!("{stem}.fna")),
            &dir.path().join(format!("{stem}.features.tsv")),
        );
        assert!(
            matches!(result, Err(GenomeError::Feature { line: 1, .. })),
            "case {case:?} should fail"
        );
    }
}

#[test]
fn test_genome_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_genome(dir.path(), "b", FASTA, FEATURES);
    write_genome(dir.path(), "a", FASTA, FEATURES);
    // an .fna without a feature sibling is not a genome
    std::fs::write(dir.path().join("orphan.fna"), FASTA).unwrap();
    // unrelated files are ignored
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let genomes = GenomeDirectory::open(dir.path()).unwrap();
    assert_eq!(genomes.len(), 2);
    assert!(!genomes.is_empty());

    let ids: Vec<String> = genomes
        .genomes()
        .map(|g| g.unwrap().id().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let genomes = GenomeDirectory::open(dir.path()).unwrap();
    assert!(genomes.is_empty());
    assert_eq!(genomes.genomes().count(), 0);
}
