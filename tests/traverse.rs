use kmer_frames::kmer::{self, Kmer, KmerError, KmerSize};
use kmer_frames::traverse::{KmerStrategy, SequenceKmers};

const SEQUENCE: &[u8] = b"atgaatgaacgttaccagtgtttaaaaactxaaagaatatcaggcacttttatcttccaa";

#[test]
fn test_strategy_tags() {
    assert_eq!(KmerStrategy::Contiguous.tag(), 0);
    assert_eq!(KmerStrategy::Spaced.tag(), 1);
    assert_eq!(KmerStrategy::from_tag(0), Some(KmerStrategy::Contiguous));
    assert_eq!(KmerStrategy::from_tag(1), Some(KmerStrategy::Spaced));
    assert_eq!(KmerStrategy::from_tag(7), None);
}

#[test]
fn test_strategy_parse() {
    assert_eq!("contiguous".parse(), Ok(KmerStrategy::Contiguous));
    assert_eq!("normal".parse(), Ok(KmerStrategy::Contiguous));
    assert_eq!("spaced".parse(), Ok(KmerStrategy::Spaced));
    assert!("wobbly".parse::<KmerStrategy>().is_err());
    assert_eq!(KmerStrategy::Contiguous.to_string(), "contiguous");
    assert_eq!(KmerStrategy::Spaced.to_string(), "spaced");
}

#[test]
fn test_strategy_region_size() {
    let k10 = KmerSize::new(10).unwrap();
    assert_eq!(KmerStrategy::Contiguous.region_size(k10), 10);
    assert_eq!(KmerStrategy::Spaced.region_size(k10), 15);
}

#[test]
fn test_spaced_rejects_odd_size() {
    let k9 = KmerSize::new(9).unwrap();
    assert_eq!(
        KmerStrategy::Spaced.check(k9),
        Err(KmerError::OddSpacedSize(9))
    );
    assert!(SequenceKmers::new(KmerStrategy::Spaced, SEQUENCE, k9).is_err());
    assert!(KmerStrategy::Contiguous.check(k9).is_ok());
}

#[test]
fn test_contiguous_traversal() {
    let k = KmerSize::new(10).unwrap();
    let mut walker = SequenceKmers::new(KmerStrategy::Contiguous, SEQUENCE, k).unwrap();

    let mut positions = Vec::new();
    while walker.advance() {
        let pos = walker.position();
        // every emitted kmer matches a direct encode of its window
        assert_eq!(walker.current(), kmer::encode(SEQUENCE, pos, k));
        assert!(walker.current().is_code());
        positions.push(pos);
    }
    assert_eq!(walker.current(), Kmer::Eof);
    assert_eq!(walker.position(), 52);

    // positions 22..=31 have the ambiguity character in their window
    let expected: Vec<usize> = (1..=21).chain(32..=51).collect();
    assert_eq!(positions, expected);
}

#[test]
fn test_contiguous_reverse_in_place() {
    let k = KmerSize::new(10).unwrap();
    let mut walker = SequenceKmers::new(KmerStrategy::Contiguous, SEQUENCE, k).unwrap();
    assert!(walker.advance());
    // forward window is atgaatgaac; its reverse complement is gttcattcat
    assert_eq!(walker.current().to_dna(k), "atgaatgaac");
    walker.reverse_in_place();
    assert_eq!(walker.current().to_dna(k), "gttcattcat");
    // sentinels pass through untouched
    while walker.advance() {}
    walker.reverse_in_place();
    assert_eq!(walker.current(), Kmer::Eof);
}

#[test]
fn test_spaced_traversal_first_windows() {
    let k = KmerSize::new(10).unwrap();
    let mut walker = SequenceKmers::new(KmerStrategy::Spaced, SEQUENCE, k).unwrap();
    assert_eq!(walker.region_size(), 15);

    // window 1..=15 is atgaatgaacgttac; the kmer keeps the first two bases
    // of each 3-base group
    assert!(walker.advance());
    assert_eq!(walker.position(), 1);
    assert_eq!(walker.current().to_dna(k), "ataagacgta");

    // the reverse kmer reads the other two bases of each group,
    // complemented and reversed
    walker.reverse_in_place();
    assert_eq!(walker.current().to_dna(k), "gtacttatca");

    assert!(walker.advance());
    assert_eq!(walker.position(), 2);
    assert_eq!(walker.current().to_dna(k), "tgataagtac");
}

#[test]
fn test_spaced_traversal_skips_read_ambiguity_only() {
    let k = KmerSize::new(10).unwrap();
    let mut walker = SequenceKmers::new(KmerStrategy::Spaced, SEQUENCE, k).unwrap();

    let mut positions = Vec::new();
    while walker.advance() {
        positions.push(walker.position());
    }
    // last window is 46..=60
    assert_eq!(positions.last(), Some(&46));

    // the ambiguity character sits at position 31; windows overlapping it
    // are only skipped when one of their sampled bases reads it
    assert!(!positions.contains(&18));
    assert!(!positions.contains(&31));
    assert!(positions.contains(&20));
    assert!(positions.contains(&23));
    assert!(positions.contains(&26));
    assert!(positions.contains(&29));
    assert!(positions.contains(&32));
}

#[test]
fn test_spaced_reverse_can_be_null() {
    let k = KmerSize::new(10).unwrap();
    let mut walker = SequenceKmers::new(KmerStrategy::Spaced, SEQUENCE, k).unwrap();
    // position 20 skips the ambiguity character going forward but reads it
    // in the reverse sampling
    while walker.advance() && walker.position() < 20 {}
    assert_eq!(walker.position(), 20);
    assert!(walker.current().is_code());
    walker.reverse_in_place();
    assert_eq!(walker.current(), Kmer::Null);
}

#[test]
fn test_spaced_short_sequence() {
    let k = KmerSize::new(10).unwrap();
    // 14 bases, one short of the 15-base window
    let mut walker =
        SequenceKmers::new(KmerStrategy::Spaced, b"atgaatgaacgtta", k).unwrap();
    assert!(!walker.advance());
    assert_eq!(walker.current(), Kmer::Eof);
}
