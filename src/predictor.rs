//! Frame prediction from a previously exported kmer table.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::frame::Frame;
use crate::kmer::{self, Kmer, KmerError, KmerSize};

/// Errors raised while loading a prediction table.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("bad kmer table line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("kmer table has no data rows")]
    Empty,
    #[error(transparent)]
    Kmer(#[from] KmerError),
}

/// An immutable kmer-to-frame mapping loaded from a `kmers.tbl` export.
/// Kmers absent from the table predict `XX`.
pub struct FramePredictor {
    k: KmerSize,
    frames: HashMap<u32, Frame>,
}

impl FramePredictor {
    /// Load a predictor from a tab-separated table: a header line, then one
    /// row per kmer with the kmer string and frame label in the first two
    /// columns (auxiliary statistics are ignored).  The kmer size comes from
    /// the first row; rows of any other length are rejected.
    pub fn load(path: &Path) -> Result<FramePredictor, PredictorError> {
        let text = std::fs::read_to_string(path)?;
        let mut k: Option<KmerSize> = None;
        let mut frames = HashMap::new();

        for (lineno, raw) in text.lines().enumerate().skip(1) {
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }
            let parse_err = |reason: String| PredictorError::Parse {
                line: lineno + 1,
                reason,
            };

            let mut fields = line.split('\t');
            let kmer_str = fields
                .next()
                .ok_or_else(|| parse_err("missing kmer column".to_string()))?;
            let frame_str = fields
                .next()
                .ok_or_else(|| parse_err("missing frame column".to_string()))?;

            let size = match k {
                Some(size) => {
                    if kmer_str.len() != size.get() {
                        return Err(parse_err(format!(
                            "kmer {kmer_str:?} does not match table kmer size {size}"
                        )));
                    }
                    size
                }
                None => {
                    let size = KmerSize::new(kmer_str.len())?;
                    k = Some(size);
                    size
                }
            };

            let code = match kmer::encode(kmer_str.as_bytes(), 1, size) {
                Kmer::Code(code) => code,
                _ => return Err(parse_err(format!("unencodable kmer {kmer_str:?}"))),
            };
            let frame = Frame::from_str(frame_str).map_err(|e| parse_err(e.to_string()))?;
            frames.insert(code, frame);
        }

        match k {
            Some(k) => Ok(FramePredictor { k, frames }),
            None => Err(PredictorError::Empty),
        }
    }

    /// The kmer size the table was built with.
    #[inline]
    pub fn k(&self) -> KmerSize {
        self.k
    }

    /// Number of kmers in the table.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The predicted frame for a packed kmer code.
    pub fn frame_of_code(&self, code: u32) -> Frame {
        self.frames.get(&code).copied().unwrap_or(Frame::XX)
    }

    /// The predicted frame for a kmer string.  Strings of the wrong length
    /// or with ambiguity characters predict `XX`.
    pub fn frame_of(&self, kmer_str: &str) -> Frame {
        if kmer_str.len() != self.k.get() {
            return Frame::XX;
        }
        match kmer::encode(kmer_str.as_bytes(), 1, self.k) {
            Kmer::Code(code) => self.frame_of_code(code),
            _ => Frame::XX,
        }
    }
}
