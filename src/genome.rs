//! Genome collaborators: contigs, annotated features, directory traversal,
//! and the per-contig coding map.
//!
//! A genome on disk is a FASTA file of contigs (`X.fna`) next to a
//! tab-separated feature file (`X.features.tsv`) with one feature per line:
//!
//! ```text
//! contig_id<TAB>strand<TAB>left-right[,left-right...]
//! ```
//!
//! Region pairs are 1-based and closed; blank lines and `#` comments are
//! skipped.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use bio::io::fasta;
use thiserror::Error;

use crate::locations::{Location, LocationError, LocationList, Strand};

/// Errors raised while loading genomes from disk.
#[derive(Debug, Error)]
pub enum GenomeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("FASTA error in {path}: {reason}")]
    Fasta { path: PathBuf, reason: String },
    #[error("bad feature line {line} in {path}: {reason}")]
    Feature {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// A single DNA sequence within a genome assembly.  Sequences are held
/// lower-case, the convention the kmer codec documents.
#[derive(Clone, Debug)]
pub struct Contig {
    id: String,
    sequence: Vec<u8>,
}

impl Contig {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Contig {
        let mut sequence = sequence.into();
        sequence.make_ascii_lowercase();
        Contig {
            id: id.into(),
            sequence,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// A genome: contigs plus annotated feature locations.
#[derive(Clone, Debug)]
pub struct Genome {
    id: String,
    contigs: Vec<Contig>,
    features: Vec<Location>,
}

impl Genome {
    /// An empty genome, to be filled programmatically.
    pub fn new(id: impl Into<String>) -> Genome {
        Genome {
            id: id.into(),
            contigs: Vec::new(),
            features: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    #[inline]
    pub fn features(&self) -> &[Location] {
        &self.features
    }

    pub fn add_contig(&mut self, id: impl Into<String>, sequence: impl Into<Vec<u8>>) {
        self.contigs.push(Contig::new(id, sequence));
    }

    pub fn add_feature(&mut self, location: Location) {
        self.features.push(location);
    }

    /// The sequence for a contig, if present.
    pub fn sequence(&self, contig_id: &str) -> Option<&[u8]> {
        self.contigs
            .iter()
            .find(|c| c.id() == contig_id)
            .map(Contig::sequence)
    }

    /// Load a genome from a FASTA file and its sibling feature file.  The
    /// genome id is the FASTA file stem.
    pub fn load(fasta_path: &Path, features_path: &Path) -> Result<Genome, GenomeError> {
        let id = fasta_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut genome = Genome::new(id);

        let reader = fasta::Reader::new(File::open(fasta_path)?);
        for result in reader.records() {
            let record = result.map_err(|e| GenomeError::Fasta {
                path: fasta_path.to_path_buf(),
                reason: e.to_string(),
            })?;
            genome.add_contig(record.id(), record.seq());
        }

        let text = std::fs::read_to_string(features_path)?;
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let feature = parse_feature(line).map_err(|reason| GenomeError::Feature {
                path: features_path.to_path_buf(),
                line: lineno + 1,
                reason,
            })?;
            genome.add_feature(feature);
        }
        Ok(genome)
    }

    /// Build the per-contig frame map from this genome's features.
    pub fn coding_map(&self) -> Result<HashMap<String, LocationList>, LocationError> {
        let mut map: HashMap<String, LocationList> = self
            .contigs
            .iter()
            .map(|c| (c.id().to_string(), LocationList::new(c.id())))
            .collect();
        for feature in &self.features {
            if let Some(list) = map.get_mut(feature.contig_id()) {
                list.add_location(feature)?;
            }
        }
        Ok(map)
    }
}

fn parse_feature(line: &str) -> Result<Location, String> {
    let mut fields = line.split('\t');
    let contig_id = fields.next().ok_or("missing contig id")?;
    let strand_field = fields.next().ok_or("missing strand")?;
    let regions_field = fields.next().ok_or("missing region list")?;

    let mut strand_chars = strand_field.chars();
    let strand = strand_chars
        .next()
        .filter(|_| strand_chars.next().is_none())
        .and_then(Strand::from_symbol)
        .ok_or_else(|| format!("bad strand {strand_field:?}"))?;

    let mut location = Location::new(contig_id, strand);
    for pair in regions_field.split(',') {
        let (left, right) = pair
            .split_once('-')
            .ok_or_else(|| format!("bad region {pair:?}"))?;
        let left: usize = left
            .trim()
            .parse()
            .map_err(|_| format!("bad region {pair:?}"))?;
        let right: usize = right
            .trim()
            .parse()
            .map_err(|_| format!("bad region {pair:?}"))?;
        if left > right || left == 0 {
            return Err(format!("bad region {pair:?}"));
        }
        location.put_region(left, right);
    }
    if location.is_empty() {
        return Err("empty region list".to_string());
    }
    Ok(location)
}

/// A directory of genomes: every `*.fna` file with a matching
/// `*.features.tsv` sibling.  Genomes are loaded lazily, one at a time, so
/// only one genome's sequences are in memory during a scan.
pub struct GenomeDirectory {
    entries: Vec<(PathBuf, PathBuf)>,
}

impl GenomeDirectory {
    /// Discover the genomes under `dir`.  The listing is sorted for
    /// deterministic processing order.
    pub fn open(dir: &Path) -> Result<GenomeDirectory, GenomeError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "fna") {
                let features = path.with_extension("features.tsv");
                if features.is_file() {
                    entries.push((path, features));
                }
            }
        }
        entries.sort();
        Ok(GenomeDirectory { entries })
    }

    /// Number of genomes discovered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load each genome in turn.
    pub fn genomes(&self) -> impl Iterator<Item = Result<Genome, GenomeError>> + '_ {
        self.entries
            .iter()
            .map(|(fasta, features)| Genome::load(fasta, features))
    }
}
