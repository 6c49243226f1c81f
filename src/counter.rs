//! The frame-by-kmer count table: accumulation, queries, persistence, and
//! the exported kmer report.
//!
//! On-disk counter format, all integers little-endian:
//!
//! ```text
//! [i32 kmer size][i32 strategy tag][7 * 4^k * u16 counts]
//! ```
//!
//! Counts are frame-major (one full `4^k` row per frame ordinal).  The file
//! length is fully determined by the kmer size, which `load` checks before
//! reading the matrix.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use crate::frame::{Frame, N_FRAMES};
use crate::genome::{Genome, GenomeError};
use crate::kmer::{self, Kmer, KmerError, KmerSize};
use crate::locations::{LocationError, LocationList};
use crate::traverse::{KmerStrategy, SequenceKmers};

/// Errors raised by the counter.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid counter file: {0}")]
    Format(String),
    #[error(transparent)]
    Kmer(#[from] KmerError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Genome(#[from] GenomeError),
}

/// A `7 x 4^k` matrix of saturating unsigned 16-bit counters, keyed by
/// (frame ordinal, kmer code).
pub struct FrameKmerCounter {
    k: KmerSize,
    strategy: KmerStrategy,
    counts: Vec<u16>,
}

impl FrameKmerCounter {
    /// Allocate an empty counter.  Fails when the strategy rejects the kmer
    /// size.  The matrix is allocated once and retained for the lifetime of
    /// the counter; the kmer-size cap keeps the allocation bounded.
    pub fn new(k: KmerSize, strategy: KmerStrategy) -> Result<FrameKmerCounter, KmerError> {
        strategy.check(k)?;
        Ok(FrameKmerCounter {
            k,
            strategy,
            counts: vec![0; N_FRAMES * k.max_kmers()],
        })
    }

    #[inline]
    pub fn k(&self) -> KmerSize {
        self.k
    }

    #[inline]
    pub fn strategy(&self) -> KmerStrategy {
        self.strategy
    }

    #[inline]
    fn cell(&self, code: u32, frame: Frame) -> usize {
        frame.ordinal() * self.k.max_kmers() + code as usize
    }

    /// Bump the count for a kmer in a frame.  `XX` is a no-op; counts
    /// saturate at `u16::MAX` instead of wrapping.
    pub fn increment(&mut self, code: u32, frame: Frame) {
        if frame == Frame::XX {
            return;
        }
        let cell = self.cell(code, frame);
        self.counts[cell] = self.counts[cell].saturating_add(1);
    }

    /// The count for a kmer in a frame (`XX` is always zero).
    pub fn count(&self, code: u32, frame: Frame) -> u16 {
        if frame == Frame::XX {
            return 0;
        }
        self.counts[self.cell(code, frame)]
    }

    /// The frame with the strictly highest count for a kmer.  Ties favor the
    /// lowest frame ordinal; a kmer with no counts at all yields `XX`.
    pub fn best_frame(&self, code: u32) -> Frame {
        let mut best = Frame::XX;
        let mut best_count = 0u16;
        for &frame in &Frame::ALL {
            let count = self.count(code, frame);
            if count > best_count {
                best_count = count;
                best = frame;
            }
        }
        best
    }

    /// The fraction of a kmer's hits that fall in a frame, or 0 when the
    /// kmer was never counted.
    pub fn fraction(&self, code: u32, frame: Frame) -> f64 {
        let total: u32 = Frame::ALL
            .iter()
            .map(|&f| self.count(code, f) as u32)
            .sum();
        if total == 0 {
            return 0.0;
        }
        self.count(code, frame) as f64 / total as f64
    }

    /// Ascending kmer codes with at least one non-zero count, by forward
    /// scan over the matrix.
    pub fn kmers(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.k.max_kmers() as u32)
            .filter(move |&code| Frame::ALL.iter().any(|&f| self.count(code, f) > 0))
    }

    /// Erase all the counts so we can start over.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Count every kmer of every contig in a genome, using the genome's
    /// feature annotations to assign frames.
    pub fn process_genome(&mut self, genome: &Genome) -> Result<(), CounterError> {
        let coding_map = genome.coding_map()?;
        for contig in genome.contigs() {
            if let Some(locs) = coding_map.get(contig.id()) {
                self.count_sequence(locs, contig.sequence())?;
            }
        }
        Ok(())
    }

    /// Count every kmer of one sequence against a contig's frame map.
    ///
    /// For each position with a known frame, the forward kmer is counted in
    /// that frame and the reverse kmer in the strand-reversed frame.  The
    /// reverse window can include bases the forward kmer skipped, so it may
    /// come back `Null`; that position then simply has no reverse count.
    pub fn count_sequence(
        &mut self,
        locs: &LocationList,
        sequence: &[u8],
    ) -> Result<(), KmerError> {
        let mut walker = SequenceKmers::new(self.strategy, sequence, self.k)?;
        let span = walker.region_size();
        while walker.advance() {
            let pos = walker.position();
            let frame = locs.compute_region_frame(pos, pos + span - 1);
            if frame == Frame::XX {
                continue;
            }
            if let Kmer::Code(code) = walker.current() {
                self.increment(code, frame);
            }
            walker.reverse_in_place();
            if let Kmer::Code(code) = walker.current() {
                self.increment(code, frame.rev());
            }
        }
        Ok(())
    }

    /// Serialize to disk in the fixed binary layout.
    pub fn save(&self, path: &Path) -> Result<(), CounterError> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_i32::<LE>(self.k.get() as i32)?;
        writer.write_i32::<LE>(self.strategy.tag())?;
        for &count in &self.counts {
            writer.write_u16::<LE>(count)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Restore a counter from disk.  The kmer size, strategy tag, and exact
    /// file length are validated before any cell is read; a mismatch returns
    /// an error and no partial table.
    pub fn load(path: &Path) -> Result<FrameKmerCounter, CounterError> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let k_raw = reader.read_i32::<LE>()?;
        let k = usize::try_from(k_raw)
            .map_err(|_| CounterError::Format(format!("bad kmer size {k_raw}")))
            .and_then(|n| KmerSize::new(n).map_err(CounterError::Kmer))?;
        let tag = reader.read_i32::<LE>()?;
        let strategy = KmerStrategy::from_tag(tag)
            .ok_or_else(|| CounterError::Format(format!("unknown traversal-strategy tag {tag}")))?;

        let cells = N_FRAMES * k.max_kmers();
        let expected_len = 8 + 2 * cells as u64;
        if file_len != expected_len {
            return Err(CounterError::Format(format!(
                "file length {file_len} does not match kmer size {k} (expected {expected_len})"
            )));
        }

        let mut counts = vec![0u16; cells];
        reader.read_u16_into::<LE>(&mut counts)?;
        Ok(FrameKmerCounter {
            k,
            strategy,
            counts,
        })
    }

    /// Write the tab-separated kmer table: one row per non-zero kmer whose
    /// best-frame fraction and hit count clear the thresholds.  Returns the
    /// number of rows written.
    pub fn write_kmer_table<W: Write>(
        &self,
        writer: &mut W,
        min_frac: f64,
        min_hits: u16,
    ) -> io::Result<usize> {
        writeln!(writer, "kmer\tframe\tfraction\thits")?;
        let mut rows = 0usize;
        for code in self.kmers() {
            let best = self.best_frame(code);
            let frac = self.fraction(code, best);
            let hits = self.count(code, best);
            if frac >= min_frac && hits >= min_hits {
                writeln!(
                    writer,
                    "{}\t{}\t{:.2}\t{}",
                    kmer::decode(code, self.k),
                    best,
                    frac,
                    hits
                )?;
                rows += 1;
            }
        }
        Ok(rows)
    }
}
