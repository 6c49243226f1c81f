use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;

use kmer_frames::frame::N_FRAMES;
use kmer_frames::{
    Frame, FramePredictor, GenomeDirectory, Kmer, KmerStrategy, SequenceKmers,
};

/// Check a kmer frame table against annotated genomes.
///
/// Every kmer of every contig whose frame the predictor knows is compared
/// against the frame implied by the genome's own annotations; agreements and
/// disagreements are tallied per predicted frame.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Kmer table (`kmers.tbl`) to verify
    table: PathBuf,

    /// Genome directory to verify against
    genomes: PathBuf,

    /// Traverse with spaced kmers (must match how the table was built)
    #[arg(long, default_value_t = false)]
    spaced: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let predictor = FramePredictor::load(&args.table)
        .with_context(|| format!("loading kmer table {}", args.table.display()))?;
    let k = predictor.k();
    let strategy = if args.spaced {
        KmerStrategy::Spaced
    } else {
        KmerStrategy::Contiguous
    };
    strategy.check(k)?;

    let genomes = GenomeDirectory::open(&args.genomes)
        .with_context(|| format!("reading genome directory {}", args.genomes.display()))?;
    if genomes.is_empty() {
        bail!("no genomes found in {}", args.genomes.display());
    }
    info!(
        "verifying {} kmers of size {k} against {} genomes",
        predictor.len(),
        genomes.len()
    );

    let mut good = [0u64; N_FRAMES];
    let mut bad = [0u64; N_FRAMES];
    for genome in genomes.genomes() {
        let genome = genome?;
        let coding_map = genome.coding_map()?;
        for contig in genome.contigs() {
            let Some(locs) = coding_map.get(contig.id()) else {
                continue;
            };
            let mut walker = SequenceKmers::new(strategy, contig.sequence(), k)?;
            let span = walker.region_size();
            while walker.advance() {
                let Kmer::Code(code) = walker.current() else {
                    continue;
                };
                let predicted = predictor.frame_of_code(code);
                if predicted == Frame::XX {
                    continue;
                }
                let pos = walker.position();
                let actual = locs.compute_region_frame(pos, pos + span - 1);
                if actual == Frame::XX {
                    continue;
                }
                if actual == predicted {
                    good[predicted.ordinal()] += 1;
                } else {
                    bad[predicted.ordinal()] += 1;
                }
            }
        }
        info!("finished genome {}", genome.id());
    }

    let total_good: u64 = good.iter().sum();
    let total_bad: u64 = bad.iter().sum();
    println!("frame\tgood\tbad");
    for frame in Frame::ALL {
        println!(
            "{}\t{}\t{}",
            frame,
            good[frame.ordinal()],
            bad[frame.ordinal()]
        );
    }
    println!("total\t{total_good}\t{total_bad}");

    Ok(())
}
