mod cache;
mod classify;
mod replacement;
mod report;
mod simulator;
mod stats;
mod trace;

use std::{io, path::PathBuf};

use anyhow::{Result, bail};
use cache::{CacheConfig, ReplacementPolicy};
use clap::Parser;
use log::info;
use report::{CompactReport, DetailSelection, DetailedReport, ReportMode, prompt_selection};
use simulator::Simulator;
use trace::TraceFile;

#[derive(Parser)]
#[command(
    name = "cache-sim",
    version,
    about = "Set-associative cache simulator with compulsory/conflict/capacity miss breakdown"
)]
struct Cli {
    /// Number of sets (power of two)
    nsets: u32,

    /// Block size in bytes (power of two)
    bsize: u32,

    /// Ways per set (power of two)
    assoc: u32,

    /// Replacement policy: L (LRU) or R (Random)
    policy: ReplacementPolicy,

    /// 0 for the detailed report, 1 for a single compact line
    output_flag: ReportMode,

    /// Binary trace of big-endian 32-bit addresses
    input: PathBuf,

    /// Detailed report content (counts, rates or both); asked interactively if omitted
    #[arg(long)]
    show: Option<DetailSelection>,

    /// Seed for the Random policy
    #[arg(long)]
    seed: Option<u64>,

    /// Log evictions and run progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CacheConfig {
        nsets: cli.nsets,
        bsize: cli.bsize,
        assoc: cli.assoc,
        policy: cli.policy,
    };
    config.validate()?;

    let trace = TraceFile::load(&cli.input)?;
    info!(
        "{}: {} addresses, {} sets x {} B x {}-way, {}",
        trace.name,
        trace.addresses.len(),
        config.nsets,
        config.bsize,
        config.assoc,
        config.policy
    );

    let rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut simulator = Simulator::new(&config, rng);
    let stats = simulator.run_trace(&trace.addresses).clone();
    info!(
        "simulated {} accesses over {} distinct lines, {} of {} slots filled",
        stats.accesses,
        simulator.distinct_lines(),
        stats.occupied,
        config.total_slots()
    );

    if stats.accesses == 0 {
        bail!("{} contains no complete address; nothing to report", trace.name);
    }

    match cli.output_flag {
        ReportMode::Compact => println!("{}", CompactReport(&stats)),
        ReportMode::Detailed => {
            let selection = match cli.show {
                Some(selection) => selection,
                None => prompt_selection(io::stdin().lock(), io::stdout())?,
            };
            print!("{}", DetailedReport { stats: &stats, selection });
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
