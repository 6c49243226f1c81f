//! Coding-frame statistics for bit-packed DNA kmers.
//!
//! For every DNA kmer of a fixed length `k` (1..=15), this crate computes
//! which reading frame of a genome the kmer most often falls in, and
//! persists that statistic for later lookup.  The statistic supports
//! classifying unannotated DNA by coding frame using kmer signatures.
//!
//! The pipeline: a genome's feature annotations are folded into a per-contig
//! [`LocationList`], which assigns a frame to any position; each contig's
//! sequence is walked by [`SequenceKmers`] (contiguous or spaced windows);
//! every emitted kmer increments the [`FrameKmerCounter`] cell for its
//! frame, along with the reverse-complement kmer in the opposite frame.
//! The counter serializes to a fixed binary layout and exports a
//! tab-separated kmer table, which [`FramePredictor`] later loads for O(1)
//! classification.

pub mod counter;
pub mod frame;
pub mod genome;
pub mod kmer;
pub mod locations;
pub mod predictor;
pub mod traverse;

pub use counter::{CounterError, FrameKmerCounter};
pub use frame::Frame;
pub use genome::{Contig, Genome, GenomeDirectory, GenomeError};
pub use kmer::{Kmer, KmerError, KmerSize};
pub use locations::{Location, LocationError, LocationList, Region, Strand};
pub use predictor::{FramePredictor, PredictorError};
pub use traverse::{KmerStrategy, SequenceKmers};
