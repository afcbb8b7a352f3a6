use anyhow::{Context, Result};
use clap::Parser;
use flock_client::{build_flock, load_settings, run, RunOptions};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless bird flock runner", long_about = None)]
struct Args {
    /// JSON settings file; flags below override its values
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of birds
    #[arg(short, long)]
    population: Option<usize>,

    /// Seed for a reproducible run (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// World half-width
    #[arg(long)]
    width: Option<f32>,

    /// World half-height
    #[arg(long)]
    height: Option<f32>,

    /// World half-depth
    #[arg(long)]
    depth: Option<f32>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Write a snapshot every N frames
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    every: u64,

    /// Step every bird against the previous frame instead of in index order
    #[arg(long)]
    simultaneous: bool,

    /// Output file for JSON lines (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(population) = args.population {
        settings.population = population;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(depth) = args.depth {
        settings.depth = depth;
    }

    log::info!("Flock client starting...");
    log::info!(
        "{} birds in {} x {} x {}, seed {:?}",
        settings.population,
        settings.width,
        settings.height,
        settings.depth,
        settings.seed
    );

    let mut flock = build_flock(&settings).context("Failed to initialize flock")?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let options = RunOptions {
        frames: args.frames,
        every: args.every,
        simultaneous: args.simultaneous,
    };
    if options.simultaneous {
        log::info!("Using simultaneous update");
    }

    let summary = run(&mut flock, &options, &mut out).context("Simulation error")?;

    let fps = summary.frames as f64 / summary.elapsed.as_secs_f64().max(f64::EPSILON);
    log::info!(
        "Simulated {} frames ({:.0} frames/s), wrote {} snapshots",
        summary.frames,
        fps,
        summary.records
    );

    Ok(())
}
