//! Image info command.
//!
//! Displays dimensions, channel maximum and a few pixel statistics.

use crate::InfoArgs;
use anyhow::{Context, Result};
use pixmap_core::PixelBuffer;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Summary of one image, also the `--json` record.
#[derive(Debug, Serialize)]
struct ImageInfo {
    path: String,
    width: u32,
    height: u32,
    max_value: u8,
    pixels: usize,
    file_size: u64,
    greyscale: bool,
    mean: [f64; 3],
}

impl ImageInfo {
    fn collect(path: &Path, image: &PixelBuffer, file_size: u64) -> Self {
        let mut sum = [0u64; 3];
        for px in image.pixels() {
            for (acc, v) in sum.iter_mut().zip(px.to_array()) {
                *acc += v as u64;
            }
        }
        let n = image.len().max(1) as f64;
        Self {
            path: path.display().to_string(),
            width: image.width(),
            height: image.height(),
            max_value: image.max_value(),
            pixels: image.len(),
            file_size,
            greyscale: image.pixels().iter().all(|px| px.is_grey()),
            mean: sum.map(|s| s as f64 / n),
        }
    }
}

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    let mut records = Vec::with_capacity(args.input.len());

    for path in &args.input {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let image = super::load_image(path)?;
        let info = ImageInfo::collect(path, &image, file_size);

        if args.json {
            records.push(info);
        } else {
            print_text(&info, verbose);
            if args.input.len() > 1 {
                println!();
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}

fn print_text(info: &ImageInfo, verbose: u8) {
    println!("{}", info.path);
    println!("  Resolution: {}x{}", info.width, info.height);
    println!("  Max value:  {}", info.max_value);
    println!("  Pixels:     {}", info.pixels);
    println!("  File size:  {}", super::format_size(info.file_size));
    if verbose > 0 {
        println!("  Greyscale:  {}", info.greyscale);
        println!(
            "  Mean RGB:   {:.3} {:.3} {:.3}",
            info.mean[0], info.mean[1], info.mean[2]
        );
    }
}
