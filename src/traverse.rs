//! Kmer traversal over a DNA sequence: contiguous and spaced strategies.
//!
//! Both strategies walk a sequence one position at a time and hand out
//! successive kmer codes.  [`SequenceKmers::current`] returns a copy; callers
//! that need the value past the next [`advance`](SequenceKmers::advance) or
//! [`reverse_in_place`](SequenceKmers::reverse_in_place) must copy it out
//! first.

use std::fmt;
use std::str::FromStr;

use crate::kmer::{self, Kmer, KmerError, KmerSize, MAX_KMER_SIZE};

/// Which kmer-extraction algorithm built a dataset.  Recorded as an integer
/// tag in persisted artifacts so counters and predictors stay agnostic to
/// the algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KmerStrategy {
    /// The kmer is `k` consecutive bases.
    Contiguous,
    /// The kmer takes the first two bases of successive 3-base groups,
    /// implicitly omitting every third (wobble) base.  Requires an even `k`;
    /// the window spans `k/2 * 3` bases.
    Spaced,
}

impl KmerStrategy {
    /// The integer tag stored in persisted counter files.
    pub fn tag(self) -> i32 {
        match self {
            KmerStrategy::Contiguous => 0,
            KmerStrategy::Spaced => 1,
        }
    }

    /// Recover a strategy from its persisted tag.
    pub fn from_tag(tag: i32) -> Option<KmerStrategy> {
        match tag {
            0 => Some(KmerStrategy::Contiguous),
            1 => Some(KmerStrategy::Spaced),
            _ => None,
        }
    }

    /// Validate a kmer size against this strategy.
    pub fn check(self, k: KmerSize) -> Result<(), KmerError> {
        if self == KmerStrategy::Spaced && k.get() % 2 != 0 {
            return Err(KmerError::OddSpacedSize(k.get()));
        }
        Ok(())
    }

    /// The number of sequence bases spanned by one kmer window.
    pub fn region_size(self, k: KmerSize) -> usize {
        match self {
            KmerStrategy::Contiguous => k.get(),
            KmerStrategy::Spaced => k.get() / 2 * 3,
        }
    }
}

impl fmt::Display for KmerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KmerStrategy::Contiguous => f.write_str("contiguous"),
            KmerStrategy::Spaced => f.write_str("spaced"),
        }
    }
}

impl FromStr for KmerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contiguous" | "normal" => Ok(KmerStrategy::Contiguous),
            "spaced" => Ok(KmerStrategy::Spaced),
            other => Err(format!("unknown kmer strategy {other:?}")),
        }
    }
}

/// Walks a sequence and emits successive kmer codes for one strategy.
pub struct SequenceKmers<'a> {
    seq: &'a [u8],
    k: KmerSize,
    strategy: KmerStrategy,
    /// Current position, 1-based.  Zero before the first `advance`.
    pos: usize,
    current: Kmer,
}

impl<'a> SequenceKmers<'a> {
    /// Create a traversal over `seq`.  Fails when the strategy rejects the
    /// kmer size (odd size with [`KmerStrategy::Spaced`]).
    pub fn new(strategy: KmerStrategy, seq: &'a [u8], k: KmerSize) -> Result<Self, KmerError> {
        strategy.check(k)?;
        Ok(SequenceKmers {
            seq,
            k,
            strategy,
            pos: 0,
            current: Kmer::Null,
        })
    }

    /// Move to the next valid kmer.  Positions whose window holds an
    /// ambiguity character are skipped.  Returns FALSE exactly when the end
    /// of the sequence is reached.
    pub fn advance(&mut self) -> bool {
        let mut code = Kmer::Null;
        while code == Kmer::Null {
            self.pos += 1;
            code = self.extract(0);
        }
        self.current = code;
        code != Kmer::Eof
    }

    /// The current position in the sequence (1-based).
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// A copy of the kmer at the current position.
    #[inline]
    pub fn current(&self) -> Kmer {
        self.current
    }

    /// The kmer size in use.
    #[inline]
    pub fn k(&self) -> KmerSize {
        self.k
    }

    /// The number of sequence bases spanned by one kmer window.
    #[inline]
    pub fn region_size(&self) -> usize {
        self.strategy.region_size(self.k)
    }

    /// Replace the held kmer with the frame-relevant reverse complement of
    /// the current window, without rescanning the sequence from the start.
    ///
    /// For contiguous kmers this is the exact bitwise reverse complement.
    /// For spaced kmers the true reverse complement needs the bases the
    /// forward window skipped, so the kmer is re-derived from the other
    /// two-of-three bases of the same groups, complemented and reversed; an
    /// ambiguity character there leaves [`Kmer::Null`], which callers must
    /// treat as "no reverse kmer available".
    pub fn reverse_in_place(&mut self) {
        self.current = match self.strategy {
            KmerStrategy::Contiguous => match self.current {
                Kmer::Code(code) => Kmer::Code(kmer::rev_comp(code, self.k)),
                sentinel => sentinel,
            },
            KmerStrategy::Spaced => self.extract(1),
        };
    }

    /// Extract the kmer at the current position.  `offset` selects which two
    /// bases of each 3-base group a spaced kmer reads (0 forward, 1 reverse)
    /// and is ignored for contiguous kmers.
    fn extract(&self, offset: usize) -> Kmer {
        match self.strategy {
            KmerStrategy::Contiguous => kmer::encode(self.seq, self.pos, self.k),
            KmerStrategy::Spaced => self.spaced_kmer(offset),
        }
    }

    fn spaced_kmer(&self, offset: usize) -> Kmer {
        let k = self.k.get();
        let start = self.pos - 1;
        if start + self.region_size() > self.seq.len() {
            return Kmer::Eof;
        }
        let mut letters = [0u8; MAX_KMER_SIZE + 1];
        for group in 0..k / 2 {
            let i = start + 3 * group + offset;
            letters[2 * group] = self.seq[i];
            letters[2 * group + 1] = self.seq[i + 1];
        }
        if offset == 0 {
            kmer::encode(&letters[..k], 1, self.k)
        } else {
            kmer::encode_rc(&letters[..k], self.k)
        }
    }
}
