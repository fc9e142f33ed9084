//! CLI command implementations

pub mod batch;
pub mod blur;
pub mod greyscale;
pub mod info;
pub mod mirror;
pub mod negate;

use anyhow::{Context, Result};
use pixmap_core::PixelBuffer;
use pixmap_ops::{ForkJoin, Operation};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    pixmap_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    pixmap_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Loads `input`, applies `op` and saves the result to `output`.
pub fn apply_file(
    op: Operation,
    input: &Path,
    output: &Path,
    engine: &ForkJoin,
    verbose: u8,
) -> Result<()> {
    let image = load_image(input)?;

    if verbose > 0 {
        println!(
            "{} {} ({}x{}) -> {}",
            op,
            input.display(),
            image.width(),
            image.height(),
            output.display()
        );
    }

    let started = Instant::now();
    let result = op
        .apply(&image, engine)
        .with_context(|| format!("{} failed on {}", op.name(), input.display()))?;
    info!(
        op = op.name(),
        width = image.width(),
        height = image.height(),
        cutoff = engine.cutoff(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "transform done"
    );

    save_image(output, &result)?;

    if verbose > 0 {
        println!("Done.");
    }

    Ok(())
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
