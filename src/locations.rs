//! Strand-tagged feature locations and the non-overlapping interval model
//! that assigns a coding frame to any genomic position.
//!
//! A [`LocationList`] folds feature locations in one at a time, carving up
//! overlaps so that three things always hold afterwards: every stored
//! location is on the list's contig, no two stored locations overlap, and
//! every stored location has exactly one region.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use crate::frame::Frame;

/// Frame tables for positions inside a region.  Plus-strand frames key off
/// the offset from the region's left edge; minus-strand frames key off the
/// window end's offset from the right edge, where a minus-strand feature
/// begins.
const PLUS_FRAMES: [Frame; 3] = [Frame::P0, Frame::P1, Frame::P2];
const MINUS_FRAMES: [Frame; 3] = [Frame::M0, Frame::M1, Frame::M2];

/// Errors raised by region mutations that would cross the opposite edge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("new left position {new_left} is greater than right position {right}")]
    LeftPastRight { new_left: usize, right: usize },
    #[error("new right position {new_right} is less than left position {left}")]
    RightBeforeLeft { new_right: usize, left: usize },
    #[error("zero-length region at position {begin}")]
    EmptyRegion { begin: usize },
}

/// Orientation of a feature on a contig.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// The conventional one-character symbol.
    pub fn symbol(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }

    /// Parse the conventional symbol.
    pub fn from_symbol(c: char) -> Option<Strand> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A closed, 1-based `[left, right]` interval on a contig.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    left: usize,
    right: usize,
}

impl Region {
    pub fn new(left: usize, right: usize) -> Region {
        Region { left, right }
    }

    #[inline]
    pub fn left(self) -> usize {
        self.left
    }

    #[inline]
    pub fn right(self) -> usize {
        self.right
    }

    #[inline]
    pub fn len(self) -> usize {
        self.right + 1 - self.left
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.right < self.left
    }

    /// TRUE if the span `[pos, end]` lies wholly inside this region.
    #[inline]
    pub fn contains(self, pos: usize, end: usize) -> bool {
        self.left <= pos && end <= self.right
    }
}

impl Ord for Region {
    /// Left positions compare first; at the same start the longer region
    /// sorts first.
    fn cmp(&self, other: &Region) -> Ordering {
        self.left
            .cmp(&other.left)
            .then_with(|| other.right.cmp(&self.right))
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Region) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A feature location: a contig, a strand, an ordered list of non-overlapping
/// regions (usually one; more only for genuinely segmented features), and a
/// validity flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    contig_id: String,
    strand: Strand,
    regions: Vec<Region>,
    valid: bool,
}

impl Location {
    /// An empty location on a contig strand.
    pub fn new(contig_id: impl Into<String>, strand: Strand) -> Location {
        Location {
            contig_id: contig_id.into(),
            strand,
            regions: Vec::with_capacity(1),
            valid: true,
        }
    }

    /// A single-region location.
    pub fn with_region(
        contig_id: impl Into<String>,
        strand: Strand,
        left: usize,
        right: usize,
    ) -> Location {
        let mut loc = Location::new(contig_id, strand);
        loc.put_region(left, right);
        loc
    }

    #[inline]
    pub fn contig_id(&self) -> &str {
        &self.contig_id
    }

    #[inline]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The leftmost position (1-based).
    pub fn left(&self) -> usize {
        self.regions[0].left()
    }

    /// The rightmost position (1-based).
    pub fn right(&self) -> usize {
        self.regions[self.regions.len() - 1].right()
    }

    /// The overall length, gaps included.
    pub fn len(&self) -> usize {
        self.right() + 1 - self.left()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The transcription start: the left edge on the plus strand, the right
    /// edge on the minus strand.
    pub fn begin(&self) -> usize {
        match self.strand {
            Strand::Plus => self.left(),
            Strand::Minus => self.right(),
        }
    }

    /// The transcription end; mirror of [`begin`](Location::begin).
    pub fn end(&self) -> usize {
        match self.strand {
            Strand::Plus => self.right(),
            Strand::Minus => self.left(),
        }
    }

    /// TRUE if this location has more than one region.  Segmented features
    /// never contribute a trustworthy frame.
    pub fn is_segmented(&self) -> bool {
        self.regions.len() > 1
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark this location as invalid.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Append a region in transcription order: `begin` is the left edge on
    /// the plus strand and the right edge on the minus strand.  A region
    /// must cover at least one position.
    pub fn add_region(&mut self, begin: usize, length: usize) -> Result<(), LocationError> {
        if length == 0 {
            return Err(LocationError::EmptyRegion { begin });
        }
        match self.strand {
            Strand::Plus => self.put_region(begin, begin + length - 1),
            Strand::Minus => self.put_region(begin + 1 - length, begin),
        }
        Ok(())
    }

    /// Insert a `[left, right]` region at its start-ascending slot.
    pub fn put_region(&mut self, left: usize, right: usize) {
        let i = self.regions.partition_point(|r| r.left() < left);
        self.regions.insert(i, Region::new(left, right));
    }

    /// The bounding single-region location, keeping contig, strand, and
    /// validity.
    pub fn region_of(&self) -> Location {
        let mut loc = Location::with_region(&self.contig_id, self.strand, self.left(), self.right());
        loc.valid = self.valid;
        loc
    }

    /// Move the left edge, dropping regions that fall off.
    pub fn set_left(&mut self, new_left: usize) -> Result<(), LocationError> {
        if new_left > self.right() {
            return Err(LocationError::LeftPastRight {
                new_left,
                right: self.right(),
            });
        }
        while self.regions[0].right() < new_left {
            self.regions.remove(0);
        }
        self.regions[0].left = new_left;
        Ok(())
    }

    /// Move the right edge, dropping regions that fall off.
    pub fn set_right(&mut self, new_right: usize) -> Result<(), LocationError> {
        if new_right < self.left() {
            return Err(LocationError::RightBeforeLeft {
                new_right,
                left: self.left(),
            });
        }
        while self.regions[self.regions.len() - 1].left() > new_right {
            self.regions.pop();
        }
        let last = self.regions.len() - 1;
        self.regions[last].right = new_right;
        Ok(())
    }

    /// Compute the frame of a kmer window `[pos, end]` relative to this
    /// location.  Spans entirely outside return the background frame `F0`;
    /// spans inside an invalid location, or not wholly inside one region,
    /// return `XX`.
    pub fn region_frame(&self, pos: usize, end: usize) -> Frame {
        if end < self.left() || pos > self.right() {
            return Frame::F0;
        }
        if !self.valid {
            return Frame::XX;
        }
        for region in &self.regions {
            if region.contains(pos, end) {
                return self.calc_frame(pos, end, *region);
            }
        }
        Frame::XX
    }

    fn calc_frame(&self, pos: usize, end: usize, region: Region) -> Frame {
        match self.strand {
            Strand::Plus => PLUS_FRAMES[(pos - region.left()) % 3],
            Strand::Minus => MINUS_FRAMES[(region.right() - end) % 3],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}[{}..{}]",
            self.contig_id,
            self.strand,
            self.left(),
            self.right()
        )
    }
}

/// Region ordering extended to locations: left ascending, then right
/// descending (the longer location at a given start sorts first), strand as
/// a final tiebreak.
fn region_order(a: &Location, b: &Location) -> Ordering {
    a.left()
        .cmp(&b.left())
        .then_with(|| b.right().cmp(&a.right()))
        .then_with(|| a.strand().cmp(&b.strand()))
}

/// Per-contig sorted set of non-overlapping, single-region, strand-tagged
/// locations, used to compute coding frames for any kmer position on the
/// contig.
#[derive(Clone, Debug)]
pub struct LocationList {
    contig_id: String,
    locations: Vec<Location>,
}

impl LocationList {
    /// An empty list for one contig.
    pub fn new(contig_id: impl Into<String>) -> LocationList {
        LocationList {
            contig_id: contig_id.into(),
            locations: Vec::new(),
        }
    }

    #[inline]
    pub fn contig_id(&self) -> &str {
        &self.contig_id
    }

    /// The stored locations, sorted and non-overlapping.
    #[inline]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Fold a feature location into the list.
    ///
    /// Returns `Ok(false)` without touching the list when the feature
    /// belongs to a different contig.  A segmented feature is reduced to its
    /// bounding region and marked invalid.  Overlaps with stored locations
    /// are resolved by carving: the carved pieces covering an overlap are
    /// invalidated, since two features disagreeing about a stretch of DNA
    /// leave its frame untrustworthy.
    pub fn add_location(&mut self, loc: &Location) -> Result<bool, LocationError> {
        if loc.contig_id() != self.contig_id {
            return Ok(false);
        }
        let mut reduced = loc.region_of();
        if loc.is_segmented() {
            reduced.invalidate();
        }
        let mut pending = Some(reduced);
        while let Some(cur) = pending.take() {
            if let Some(i) = self.floor_index(&cur) {
                if self.locations[i].right() >= cur.left() {
                    let before = self.locations.remove(i);
                    pending = self.resolve_overlap(before, cur)?;
                    continue;
                }
            }
            if let Some(i) = self.ceiling_index(&cur) {
                if self.locations[i].left() <= cur.right() {
                    let after = self.locations.remove(i);
                    pending = self.resolve_overlap(cur, after)?;
                    continue;
                }
            }
            self.insert(cur);
        }
        Ok(true)
    }

    /// Compute the frame for a kmer window `[pos, end]`.
    ///
    /// Spans before the first stored location or past the last are
    /// background (`F0`), as are spans in a gap whose flanking locations
    /// share a strand.  Spans in a gap between opposite-strand locations,
    /// or crossing a stored location's boundary, have no single frame
    /// (`XX`); spans wholly inside one location delegate to it.
    pub fn compute_region_frame(&self, pos: usize, end: usize) -> Frame {
        let i = self.locations.partition_point(|loc| loc.right() < pos);
        match self.locations.get(i) {
            None => Frame::F0,
            Some(loc) if loc.left() > end => {
                if i > 0 && self.locations[i - 1].strand() != loc.strand() {
                    Frame::XX
                } else {
                    Frame::F0
                }
            }
            Some(loc) if loc.left() <= pos && end <= loc.right() => loc.region_frame(pos, end),
            Some(_) => Frame::XX,
        }
    }

    /// Index of the greatest stored location ordering at or before `loc`.
    fn floor_index(&self, loc: &Location) -> Option<usize> {
        match self.locations.binary_search_by(|probe| region_order(probe, loc)) {
            Ok(i) => Some(i),
            Err(0) => None,
            Err(i) => Some(i - 1),
        }
    }

    /// Index of the least stored location ordering at or after `loc`.
    fn ceiling_index(&self, loc: &Location) -> Option<usize> {
        match self.locations.binary_search_by(|probe| region_order(probe, loc)) {
            Ok(i) => Some(i),
            Err(i) if i < self.locations.len() => Some(i),
            Err(_) => None,
        }
    }

    fn insert(&mut self, loc: Location) {
        let i = self
            .locations
            .partition_point(|probe| region_order(probe, &loc) == Ordering::Less);
        self.locations.insert(i, loc);
    }

    /// Resolve one overlapping pair.  `loc1` orders first (earlier start, or
    /// longer at the same start).  Resolved pieces are inserted; the piece
    /// still needing resolution, if any, is returned.
    fn resolve_overlap(
        &mut self,
        mut loc1: Location,
        mut loc2: Location,
    ) -> Result<Option<Location>, LocationError> {
        if loc1.right() > loc2.right() {
            // loc2 lies wholly inside loc1.  Split off loc1's prefix, mark
            // the inner stretch invalid, and keep resolving with loc1's
            // suffix.
            if loc1.left() < loc2.left() {
                let mut prefix = loc1.clone();
                prefix.set_right(loc2.left() - 1)?;
                self.insert(prefix);
            }
            let suffix_left = loc2.right() + 1;
            loc2.invalidate();
            self.insert(loc2);
            loc1.set_left(suffix_left)?;
            Ok(Some(loc1))
        } else if loc1.left() == loc2.left() {
            // Same span (the ordering puts the longer location first, so
            // equal lefts here imply equal rights).  The stored copy is
            // invalidated; nothing of loc2 remains to resolve.
            let cut = loc1.right() + 1;
            loc1.invalidate();
            self.insert(loc1);
            if cut > loc2.right() {
                Ok(None)
            } else {
                loc2.set_left(cut)?;
                Ok(Some(loc2))
            }
        } else {
            // Partial overlap.  Both locations shrink, the overlapped extent
            // is invalidated, and loc2's unique suffix keeps resolving.
            let overlap_right = loc1.right();
            let suffix = if loc2.right() > overlap_right {
                let mut s = loc2.clone();
                s.set_left(overlap_right + 1)?;
                Some(s)
            } else {
                None
            };
            loc1.set_right(loc2.left() - 1)?;
            self.insert(loc1);
            loc2.set_right(overlap_right)?;
            loc2.invalidate();
            self.insert(loc2);
            Ok(suffix)
        }
    }
}
