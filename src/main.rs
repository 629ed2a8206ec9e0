//! circview - Circular Feature Viewer
//!
//! A terminal viewer for annotations over a circular sequence.
//!
//! ## Usage
//!
//! ```bash
//! circview                                  # built-in demo
//! circview plasmid.fasta -F features.json   # interactive viewer
//! circview plasmid.fasta -F features.json --tracks  # print track layout
//! ```
//!
//! ## Controls
//!
//! - `←/→` or `h/l`: spin the ring, `space` or key release stops it
//! - `Tab` / `Enter`: highlight / click an annotation
//! - `:<pos>`: rotate to a position
//! - `:add <id> <start> <stop> <type> [color]`, `:rm <id>`
//! - `:q`: Quit

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use circview::config::{load_features, load_options, ViewerOptions};
use circview::controller::{run_app, DEFAULT_TICK_RATE};
use circview::demo::demo_options;
use circview::fasta::read_sequence_file;
use circview::model::AppState;
use circview::viewer::CircularViewer;

/// circview - A terminal viewer for annotations over circular sequences
///
/// Without FILE, shows a built-in demo protein with six features.
/// With --tracks, prints the track layout instead of opening the viewer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA file holding the circular sequence (first record is used)
    file: Option<PathBuf>,

    /// JSON file with the annotations to display
    #[arg(short = 'F', long = "features")]
    features: Option<PathBuf>,

    /// JSON file with viewer options (sequence, features, width, height, speed)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Rotation speed multiplier
    #[arg(short = 's', long = "speed")]
    speed: Option<f64>,

    /// Residues turned per tick at speed 1
    #[arg(long = "step-residues")]
    step_residues: Option<usize>,

    /// Drawing area width
    #[arg(long = "width")]
    width: Option<u32>,

    /// Drawing area height
    #[arg(long = "height")]
    height: Option<u32>,

    /// Milliseconds between rotation ticks
    #[arg(long = "tick-ms", default_value_t = DEFAULT_TICK_RATE.as_millis() as u64)]
    tick_ms: u64,

    /// Print the track assignment of every annotation and exit
    #[arg(short = 't', long = "tracks")]
    tracks: bool,

    /// Write debug logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Sets up file logging; the terminal itself belongs to the viewer.
fn setup_logging(path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // No ANSI colors for file output
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,circview=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Merges the config file, input files and command line into viewer options.
fn build_options(args: &Args) -> Result<ViewerOptions> {
    let mut options = match (&args.config, &args.file) {
        (Some(config), _) => load_options(config)?,
        (None, Some(_)) => ViewerOptions::default(),
        (None, None) => demo_options(),
    };

    if let Some(file) = &args.file {
        let sequence = read_sequence_file(file)
            .with_context(|| format!("Failed to read sequence from {}", file.display()))?;
        options.target = sequence.id;
        options.sequence = sequence.data;
    }
    if let Some(features) = &args.features {
        options.features = load_features(features)?;
    }
    if let Some(speed) = args.speed {
        options.speed = speed;
    }
    if let Some(step) = args.step_residues {
        options.step_residues = step;
    }
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }

    Ok(options)
}

/// Runs CLI mode: prints one line per annotation with its track.
fn print_tracks(viewer: &CircularViewer) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(
        handle,
        "# {} ({} residues, {} tracks)",
        viewer.target(),
        viewer.sequence().len(),
        viewer.tracks().len()
    )?;
    writeln!(handle, "id\tstart\tstop\ttype\ttrack")?;
    for annotation in viewer.annotations() {
        let track = annotation.track.map(|t| t.to_string()).unwrap_or_default();
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            annotation.id, annotation.start, annotation.stop, annotation.kind, track
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the duration of the program
    let _log_guard = match &args.log_file {
        Some(path) => Some(setup_logging(path)?),
        None => None,
    };

    if args.tick_ms == 0 {
        anyhow::bail!("Tick interval must be at least 1 ms");
    }

    let options = build_options(&args)?;
    let viewer = CircularViewer::new(options).context("Cannot build the viewer")?;
    info!(tracks = viewer.tracks().len(), "layout ready");

    if args.tracks {
        print_tracks(&viewer)
    } else {
        run_app(AppState::new(viewer), Duration::from_millis(args.tick_ms))
    }
}
