//! Bit-packed DNA kmer codec: 2-bit mapping, sentinels, reverse complement.
//!
//! Conventions
//! - Codes accumulate **most-significant-base-first**: `code = (code << 2) | base`.
//! - Base mapping: `a=00, c=01, g=10, t/u=11`; anything else is an ambiguity
//!   character and poisons the whole window.
//! - Sentinels: [`Kmer::Null`] when the window held an ambiguity character,
//!   [`Kmer::Eof`] when fewer than `k` bases remained. `Eof` sorts after every
//!   code; `Null` is a transient traversal signal and is never stored.

use std::fmt;

use thiserror::Error;

/// Largest supported kmer size.  Codes must fit in 30 bits, and the count
/// table is sized `7 * 4^k` cells of two bytes each, so 15 is a hard cap.
pub const MAX_KMER_SIZE: usize = 15;

/// Errors raised while configuring the kmer codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KmerError {
    /// Kmer size outside the supported range.
    #[error("invalid kmer size {0}: must be between 1 and 15")]
    InvalidSize(usize),
    /// Spaced kmers take two bases from each 3-base group, so the size must
    /// be even.
    #[error("invalid kmer size {0}: spaced kmers require an even size")]
    OddSpacedSize(usize),
}

/// Validated kmer length, threaded explicitly through every structure sized
/// by `4^k`.  Structures built under different sizes must never be mixed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KmerSize(u8);

impl KmerSize {
    /// Validate and wrap a kmer size.
    pub fn new(size: usize) -> Result<Self, KmerError> {
        if size < 1 || size > MAX_KMER_SIZE {
            return Err(KmerError::InvalidSize(size));
        }
        Ok(KmerSize(size as u8))
    }

    /// The kmer length in bases.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Number of possible kmers at this size (`4^k`).
    #[inline]
    pub fn max_kmers(self) -> usize {
        1usize << (2 * self.0)
    }
}

impl fmt::Display for KmerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 256-entry LUT: ASCII → 2-bit (a=0, c=1, g=2, t/u=3), 0xFF for ambiguous.
pub static MAP_LUT: [u8; 256] = {
    const X: u8 = 0xFF;
    let mut t = [X; 256];
    t[b'A' as usize] = 0;
    t[b'a' as usize] = 0;
    t[b'C' as usize] = 1;
    t[b'c' as usize] = 1;
    t[b'G' as usize] = 2;
    t[b'g' as usize] = 2;
    t[b'T' as usize] = 3;
    t[b't' as usize] = 3;
    t[b'U' as usize] = 3;
    t[b'u' as usize] = 3;
    t
};

/// 2-bit encoding via LUT.  `None` if ambiguous.
#[inline]
pub fn map_base(b: u8) -> Option<u8> {
    let v = MAP_LUT[b as usize];
    if v <= 3 { Some(v) } else { None }
}

const BIT_MAP: [char; 4] = ['a', 'c', 'g', 't'];

/// A packed kmer or one of the two sentinels.
///
/// The derived ordering is total: `Null` first, codes by value, `Eof` last.
/// `Null` never reaches a comparison in practice; it only flags a window that
/// cannot become a kmer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kmer {
    /// The window contained an ambiguity character.
    Null,
    /// Packed 2-bit code in `0..4^k`.
    Code(u32),
    /// Fewer than `k` bases remained in the sequence.
    Eof,
}

impl Kmer {
    /// The packed code, if this is a real kmer.
    #[inline]
    pub fn code(self) -> Option<u32> {
        match self {
            Kmer::Code(code) => Some(code),
            _ => None,
        }
    }

    /// TRUE for a real kmer, FALSE for either sentinel.
    #[inline]
    pub fn is_code(self) -> bool {
        matches!(self, Kmer::Code(_))
    }

    /// The DNA string for this kmer, or the empty string for a sentinel.
    pub fn to_dna(self, k: KmerSize) -> String {
        match self {
            Kmer::Code(code) => decode(code, k),
            _ => String::new(),
        }
    }
}

/// Encode `k` bases starting at 1-based `pos`.
///
/// Returns [`Kmer::Eof`] if the window runs off the end of the sequence
/// (or `pos` is the out-of-range position 0) and [`Kmer::Null`] on the
/// first ambiguity character.
pub fn encode(seq: &[u8], pos: usize, k: KmerSize) -> Kmer {
    let k = k.get();
    let Some(start) = pos.checked_sub(1) else {
        return Kmer::Eof;
    };
    if start + k > seq.len() {
        return Kmer::Eof;
    }
    let mut code = 0u32;
    for &b in &seq[start..start + k] {
        match map_base(b) {
            Some(v) => code = (code << 2) | v as u32,
            None => return Kmer::Null,
        }
    }
    Kmer::Code(code)
}

/// Encode the reverse complement of a fixed-length window.
///
/// Unlike [`encode`] there is no starting offset: the first `k` bytes of
/// `window` are read back-to-front with each base complemented.  Returns
/// [`Kmer::Eof`] on short input, [`Kmer::Null`] on ambiguity.
pub fn encode_rc(window: &[u8], k: KmerSize) -> Kmer {
    let k = k.get();
    if window.len() < k {
        return Kmer::Eof;
    }
    let mut code = 0u32;
    for &b in window[..k].iter().rev() {
        match map_base(b) {
            Some(v) => code = (code << 2) | (v ^ 0b11) as u32,
            None => return Kmer::Null,
        }
    }
    Kmer::Code(code)
}

/// Decode a packed code back to its lower-case DNA string.
pub fn decode(code: u32, k: KmerSize) -> String {
    let k = k.get();
    let mut out = String::with_capacity(k);
    for i in (0..k).rev() {
        out.push(BIT_MAP[((code >> (2 * i)) & 3) as usize]);
    }
    out
}

/// Reverse complement of a packed code, computed purely by bit manipulation:
/// complement the whole word, then redistribute its 2-bit groups
/// right-to-left.  Equivalent to `encode_rc(decode(code, k).as_bytes(), k)`.
pub fn rev_comp(code: u32, k: KmerSize) -> u32 {
    let mut rc = 0u32;
    let mut rev = !code;
    for _ in 0..k.get() {
        rc = (rc << 2) | (rev & 3);
        rev >>= 2;
    }
    rc
}
