//! The seven coding frames plus the "no information" sentinel.
//!
//! Ordinals are fixed: they index the count matrix and define the row order
//! of the persisted binary layout.  `F0` is the extron/background frame for
//! positions outside any annotated feature; `XX` means no frame information.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of counted frames (everything except `XX`).
pub const N_FRAMES: usize = 7;

/// A coding frame.  `P*` are plus-strand offsets, `M*` minus-strand offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Frame {
    M0,
    M1,
    M2,
    F0,
    P0,
    P1,
    P2,
    XX,
}

/// Error produced when a frame label cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized frame label {0:?}")]
pub struct ParseFrameError(pub String);

impl Frame {
    /// All counted frames, in ordinal order.
    pub const ALL: [Frame; N_FRAMES] = [
        Frame::M0,
        Frame::M1,
        Frame::M2,
        Frame::F0,
        Frame::P0,
        Frame::P1,
        Frame::P2,
    ];

    /// Array index of this frame.
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// The frame for a given array index.  Indexes at or past [`N_FRAMES`]
    /// yield `XX`.
    pub fn from_ordinal(idx: usize) -> Frame {
        match idx {
            0 => Frame::M0,
            1 => Frame::M1,
            2 => Frame::M2,
            3 => Frame::F0,
            4 => Frame::P0,
            5 => Frame::P1,
            6 => Frame::P2,
            _ => Frame::XX,
        }
    }

    /// The frame seen from the opposite strand.  `F0` and `XX` are
    /// self-inverse: reversing background or unknown stays background or
    /// unknown.
    pub fn rev(self) -> Frame {
        match self {
            Frame::M0 => Frame::P0,
            Frame::M1 => Frame::P1,
            Frame::M2 => Frame::P2,
            Frame::F0 => Frame::F0,
            Frame::P0 => Frame::M0,
            Frame::P1 => Frame::M1,
            Frame::P2 => Frame::M2,
            Frame::XX => Frame::XX,
        }
    }

    /// The display label, as written in exported kmer tables.
    pub fn label(self) -> &'static str {
        match self {
            Frame::M0 => "-0",
            Frame::M1 => "-1",
            Frame::M2 => "-2",
            Frame::F0 => "0",
            Frame::P0 => "+0",
            Frame::P1 => "+1",
            Frame::P2 => "+2",
            Frame::XX => "X",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frame {
    type Err = ParseFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-0" => Ok(Frame::M0),
            "-1" => Ok(Frame::M1),
            "-2" => Ok(Frame::M2),
            "0" => Ok(Frame::F0),
            "+0" => Ok(Frame::P0),
            "+1" => Ok(Frame::P1),
            "+2" => Ok(Frame::P2),
            "X" => Ok(Frame::XX),
            other => Err(ParseFrameError(other.to_string())),
        }
    }
}
