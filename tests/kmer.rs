use kmer_frames::kmer::{self, Kmer, KmerError, KmerSize};

#[test]
fn test_encode_basic() {
    let k = KmerSize::new(4).unwrap();
    // a=00 c=01 g=10 t=11, most-significant base first
    assert_eq!(kmer::encode(b"acgt", 1, k), Kmer::Code(0b00011011));
    assert_eq!(kmer::encode(b"tgca", 1, k), Kmer::Code(0b11100100));
    assert_eq!(kmer::encode(b"aaaa", 1, k), Kmer::Code(0));
    assert_eq!(kmer::encode(b"tttt", 1, k), Kmer::Code(0b11111111));
}

#[test]
fn test_encode_case_and_uracil() {
    let k = KmerSize::new(4).unwrap();
    assert_eq!(kmer::encode(b"ACGT", 1, k), kmer::encode(b"acgt", 1, k));
    // u encodes like t
    assert_eq!(kmer::encode(b"acgu", 1, k), kmer::encode(b"acgt", 1, k));
}

#[test]
fn test_encode_offset() {
    let k = KmerSize::new(3).unwrap();
    let seq = b"ttacgtt";
    assert_eq!(kmer::encode(seq, 3, k), Kmer::Code(0b000110)); // acg
    assert_eq!(kmer::encode(seq, 4, k), Kmer::Code(0b011011)); // cgt
}

#[test]
fn test_encode_sentinels() {
    let k = KmerSize::new(4).unwrap();
    // window runs off the end
    assert_eq!(kmer::encode(b"aaaac", 3, k), Kmer::Eof);
    assert_eq!(kmer::encode(b"aaa", 1, k), Kmer::Eof);
    // positions are 1-based, so 0 is never in range
    assert_eq!(kmer::encode(b"acgtacgt", 0, k), Kmer::Eof);
    // ambiguity character anywhere in the window
    assert_eq!(kmer::encode(b"acnt", 1, k), Kmer::Null);
    assert_eq!(kmer::encode(b"xacg", 1, k), Kmer::Null);
}

#[test]
fn test_decode_round_trip() {
    let k = KmerSize::new(15).unwrap();
    let dna = "actccagcaagcatc";
    let code = kmer::encode(dna.as_bytes(), 1, k).code().unwrap();
    assert_eq!(kmer::decode(code, k), dna);
    assert_eq!(Kmer::Code(code).to_dna(k), dna);
}

#[test]
fn test_rev_comp_full_size() {
    let k = KmerSize::new(15).unwrap();
    let code = kmer::encode(b"actccagcaagcatc", 1, k).code().unwrap();
    let rc = kmer::rev_comp(code, k);
    assert_eq!(kmer::decode(rc, k), "gatgcttgctggagt");
    assert_ne!(rc, code);
    assert_eq!(kmer::encode(b"gatgcttgctggagt", 1, k), Kmer::Code(rc));
    // involution
    assert_eq!(kmer::rev_comp(rc, k), code);
}

#[test]
fn test_rev_comp_palindrome() {
    let k = KmerSize::new(4).unwrap();
    let code = kmer::encode(b"acgt", 1, k).code().unwrap();
    assert_eq!(kmer::rev_comp(code, k), code);
}

#[test]
fn test_encode_rc() {
    let k = KmerSize::new(4).unwrap();
    // reverse complement of acgg is ccgt
    assert_eq!(
        kmer::encode_rc(b"acgg", k),
        kmer::encode(b"ccgt", 1, k)
    );
    assert_eq!(kmer::encode_rc(b"aaa", k), Kmer::Eof);
    assert_eq!(kmer::encode_rc(b"acng", k), Kmer::Null);
    // extra bytes past k are ignored
    assert_eq!(kmer::encode_rc(b"acggtttt", k), kmer::encode(b"ccgt", 1, k));
}

#[test]
fn test_kmer_ordering() {
    let k = KmerSize::new(2).unwrap();
    let lo = kmer::encode(b"aa", 1, k);
    let hi = kmer::encode(b"tt", 1, k);
    assert!(Kmer::Null < lo);
    assert!(lo < hi);
    assert!(hi < Kmer::Eof);
    assert!(Kmer::Null < Kmer::Eof);
}

#[test]
fn test_sentinel_accessors() {
    let k = KmerSize::new(2).unwrap();
    assert!(!Kmer::Null.is_code());
    assert!(!Kmer::Eof.is_code());
    assert_eq!(Kmer::Null.code(), None);
    assert_eq!(Kmer::Eof.to_dna(k), "");
    assert!(Kmer::Code(3).is_code());
    assert_eq!(Kmer::Code(3).code(), Some(3));
}

#[test]
fn test_kmer_size_validation() {
    assert_eq!(KmerSize::new(0), Err(KmerError::InvalidSize(0)));
    assert_eq!(KmerSize::new(16), Err(KmerError::InvalidSize(16)));
    let k = KmerSize::new(15).unwrap();
    assert_eq!(k.get(), 15);
    assert_eq!(k.max_kmers(), 1 << 30);
    assert_eq!(KmerSize::new(1).unwrap().max_kmers(), 4);
}
