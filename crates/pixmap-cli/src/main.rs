//! pixmap - parallel PPM image transforms
//!
//! Loads a binary PPM, runs one transform through the fork/join engine and
//! writes the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pixmap_ops::{DEFAULT_SEQUENTIAL_CUTOFF, ForkJoin};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixmap")]
#[command(author, version, about = "Parallel PPM image transforms")]
#[command(long_about = "
Applies parallel transforms to binary PPM (P6) images.

Examples:
  pixmap info photo.ppm                    # Show image info
  pixmap info *.ppm --json                 # Machine-readable info
  pixmap negate photo.ppm -o neg.ppm
  pixmap greyscale photo.ppm -o grey.ppm
  pixmap mirror photo.ppm -o flipped.ppm
  pixmap blur photo.ppm -o soft.ppm -r 5 -s 2.5
  pixmap --cutoff 1000 -j 4 blur photo.ppm -o soft.ppm
  pixmap batch 'frames/*.ppm' -O out --op greyscale
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Range size below which a task stops splitting
    #[arg(long, global = true, env = "PIXMAP_CUTOFF", default_value_t = DEFAULT_SEQUENTIAL_CUTOFF)]
    cutoff: usize,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Invert every channel against the max value
    Negate(IoArgs),

    /// Convert to Rec.601 luma
    #[command(visible_alias = "grayscale")]
    Greyscale(IoArgs),

    /// Mirror left-right
    Mirror(MirrorArgs),

    /// Apply blur filter
    Blur(BlurArgs),

    /// Apply one operation to every file matching a pattern
    Batch(BatchArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct IoArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct MirrorArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Map every pixel index instead of partitioning by rows
    #[arg(long)]
    indexed: bool,
}

/// Blur kernel shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BlurKind {
    Gaussian,
    Box,
}

#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Blur radius in pixels
    #[arg(short, long, default_value = "3")]
    radius: usize,

    /// Gaussian standard deviation (ignored for box)
    #[arg(short, long, default_value = "2.0")]
    sigma: f64,

    /// Kernel shape
    #[arg(short = 'k', long, value_enum, default_value = "gaussian")]
    kind: BlurKind,
}

/// Operation applied by `batch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BatchOp {
    Negate,
    #[value(alias = "grayscale")]
    Greyscale,
    Mirror,
    Blur,
}

#[derive(Args)]
struct BatchArgs {
    /// Input pattern (glob)
    pattern: String,

    /// Output directory
    #[arg(short = 'O', long)]
    output_dir: PathBuf,

    /// Operation to apply
    #[arg(long, value_enum)]
    op: BatchOp,

    /// Blur radius in pixels
    #[arg(short, long, default_value = "3")]
    radius: usize,

    /// Gaussian standard deviation
    #[arg(short, long, default_value = "2.0")]
    sigma: f64,
}

/// Installs the fmt subscriber. `RUST_LOG` wins over the `-v` count.
///
/// The returned guard flushes the file writer on drop and must outlive
/// every log call.
fn init_logging(verbose: u8, log: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match log {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;
            Ok(None)
        }
    }
}

fn build_engine(cutoff: usize, threads: usize) -> Result<ForkJoin> {
    let engine = ForkJoin::new(cutoff).context("Invalid --cutoff")?;
    if threads > 0 {
        return engine
            .with_threads(threads)
            .context("Failed to configure thread pool");
    }
    Ok(engine)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_deref())?;

    let engine = build_engine(cli.cutoff, cli.threads)?;
    tracing::debug!(cutoff = engine.cutoff(), threads = engine.threads(), "engine ready");

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Negate(args) => commands::negate::run(args, cli.verbose, &engine),
        Commands::Greyscale(args) => commands::greyscale::run(args, cli.verbose, &engine),
        Commands::Mirror(args) => commands::mirror::run(args, cli.verbose, &engine),
        Commands::Blur(args) => commands::blur::run(args, cli.verbose, &engine),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose, &engine),
    }
}
