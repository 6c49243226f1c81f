use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;

use kmer_frames::{FrameKmerCounter, GenomeDirectory, KmerSize, KmerStrategy};

/// Build a frame-by-kmer count table from a directory of genomes.
///
/// The input directory holds one FASTA file per genome (`X.fna`) with a
/// matching feature file (`X.features.tsv`).  The output directory receives
/// the binary counter (`counter.ser`) and the filtered kmer table
/// (`kmers.tbl`).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input genome directory
    input: PathBuf,

    /// Output result directory
    output: PathBuf,

    /// Kmer size (1..=15); append "p" for spaced kmers (e.g. "8p")
    #[arg(short = 'K', long = "kmer", default_value = "15")]
    kmer: String,

    /// Minimum best-frame fraction for a kmer to be reported
    #[arg(long, default_value_t = 0.8)]
    min_frac: f64,

    /// Minimum best-frame hit count for a kmer to be reported
    #[arg(long, default_value_t = 10)]
    min_hits: u16,
}

/// Parse a kmer spec of the form `15` or `8p` (trailing "p" selects the
/// spaced strategy).
fn parse_kmer_spec(spec: &str) -> anyhow::Result<(KmerSize, KmerStrategy)> {
    let (digits, strategy) = match spec.strip_suffix('p') {
        Some(digits) => (digits, KmerStrategy::Spaced),
        None => (spec, KmerStrategy::Contiguous),
    };
    let size: usize = digits
        .parse()
        .with_context(|| format!("bad kmer spec {spec:?}"))?;
    let k = KmerSize::new(size)?;
    strategy.check(k)?;
    Ok((k, strategy))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (k, strategy) = parse_kmer_spec(&args.kmer)?;
    let genomes = GenomeDirectory::open(&args.input)
        .with_context(|| format!("reading genome directory {}", args.input.display()))?;
    if genomes.is_empty() {
        bail!("no genomes found in {}", args.input.display());
    }
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;

    info!(
        "counting {} kmers of size {k} over {} genomes",
        strategy,
        genomes.len()
    );
    let mut counter = FrameKmerCounter::new(k, strategy)?;
    for genome in genomes.genomes() {
        let genome = genome?;
        info!(
            "processing genome {} ({} contigs, {} features)",
            genome.id(),
            genome.contigs().len(),
            genome.features().len()
        );
        counter.process_genome(&genome)?;
    }

    let counter_path = args.output.join("counter.ser");
    counter.save(&counter_path)?;
    info!("saved counter to {}", counter_path.display());

    let table_path = args.output.join("kmers.tbl");
    let mut writer = BufWriter::new(File::create(&table_path)?);
    let rows = counter.write_kmer_table(&mut writer, args.min_frac, args.min_hits)?;
    writer.flush()?;
    info!("wrote {rows} kmers to {}", table_path.display());

    Ok(())
}
