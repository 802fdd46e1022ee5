//! Grid Pilot CLI
//!
//! Wires the capture loop to the platform collaborators and the chosen
//! puzzle pipeline. Without the `screen`/`input` features this runs
//! against mock collaborators, which is enough to exercise the loop and
//! the corpus tooling.

use clap::{Parser, ValueEnum};
use grid_pilot::{
    capture::FileConfig,
    control::{ControlFlags, SignalListener, StdinSignals},
    runner::{DuetPipeline, PuzzlePipeline, QueensPipeline, Runner},
    solve::{enumerate_queens, CorpusStore},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// Region-colored queens board.
    Queens,
    /// 6×6 linked binary-symbol board.
    Duet,
}

#[derive(Debug, Parser)]
#[command(name = "grid-pilot", version, about = "Watches the screen for grid puzzles and clicks in solutions")]
struct Cli {
    /// Puzzle family to watch for.
    #[arg(long, value_enum, default_value = "queens")]
    variant: Variant,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the corpus directory from the config.
    #[arg(long)]
    corpus_dir: Option<PathBuf>,

    /// Enumerate and write the queens corpus for a board side, then exit.
    #[arg(long, value_name = "SIDE")]
    build_corpus: Option<usize>,

    /// Stop after this many loop ticks (demo runs).
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Grid Pilot v{}", grid_pilot::VERSION);

    let mut config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config: {err}");
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(dir) = &cli.corpus_dir {
        config.corpus.dir = dir.clone();
    }

    if let Some(side) = cli.build_corpus {
        build_queens_corpus(&config, side);
        return;
    }

    let flags = Arc::new(ControlFlags::new());

    let ctrlc_flags = Arc::clone(&flags);
    if let Err(err) = ctrlc::set_handler(move || ctrlc_flags.request_stop()) {
        warn!(%err, "failed to install Ctrl-C handler");
    }

    let listener = SignalListener::spawn(StdinSignals::spawn(), Arc::clone(&flags));
    info!("type 'c' + Enter to toggle capture, 'q' + Enter (or Ctrl-C) to quit");

    let pipeline: Box<dyn PuzzlePipeline> = match cli.variant {
        Variant::Queens => Box::new(QueensPipeline::new(&config)),
        Variant::Duet => Box::new(DuetPipeline::new(&config)),
    };

    run_loop(pipeline, Arc::clone(&flags), &config, cli.ticks);

    // The loop is done; make sure the listener unblocks and exits too.
    flags.request_stop();
    listener.join();
    info!("done");
}

fn build_queens_corpus(config: &FileConfig, side: usize) {
    if let Err(err) = std::fs::create_dir_all(&config.corpus.dir) {
        eprintln!("Failed to create corpus directory: {err}");
        std::process::exit(1);
    }
    let store = CorpusStore::new(config.corpus.dir.clone());
    let solutions = enumerate_queens(side);
    info!(side, candidates = solutions.len(), "queens corpus enumerated");
    if let Err(err) = store.save_queens(side, &solutions) {
        eprintln!("Failed to write corpus: {err}");
        std::process::exit(1);
    }
    info!(path = %store.queens_path(side).display(), "corpus written");
}

#[cfg(feature = "screen")]
fn run_loop(
    pipeline: Box<dyn PuzzlePipeline>,
    flags: Arc<ControlFlags>,
    config: &FileConfig,
    ticks: Option<u64>,
) {
    let grabber = match grid_pilot::capture::XcapScreen::open() {
        Ok(grabber) => grabber,
        Err(err) => {
            eprintln!("Failed to open screen capture: {err}");
            std::process::exit(1);
        }
    };
    run_with_grabber(grabber, pipeline, flags, config, ticks);
}

#[cfg(not(feature = "screen"))]
fn run_loop(
    pipeline: Box<dyn PuzzlePipeline>,
    flags: Arc<ControlFlags>,
    config: &FileConfig,
    ticks: Option<u64>,
) {
    info!("no `screen` feature: demonstrating with a mock blank screen");
    let blank = image::RgbaImage::from_pixel(1280, 800, image::Rgba([255, 255, 255, 255]));
    let grabber = grid_pilot::capture::MockScreen::with_frames(vec![blank]);
    run_with_grabber(grabber, pipeline, flags, config, ticks);
}

fn run_with_grabber(
    grabber: impl grid_pilot::capture::ScreenGrabber,
    pipeline: Box<dyn PuzzlePipeline>,
    flags: Arc<ControlFlags>,
    config: &FileConfig,
    ticks: Option<u64>,
) {
    #[cfg(feature = "input")]
    {
        match grid_pilot::act::EnigoPointer::open() {
            Ok(pointer) => {
                Runner::new(grabber, pointer, pipeline, flags, config).run_for(ticks);
            }
            Err(err) => {
                eprintln!("Failed to open pointer injection: {err}");
                std::process::exit(1);
            }
        }
    }
    #[cfg(not(feature = "input"))]
    {
        info!("no `input` feature: clicks go to a mock pointer");
        let pointer = grid_pilot::act::MockPointer::new();
        Runner::new(grabber, pointer, pipeline, flags, config).run_for(ticks);
    }
}
