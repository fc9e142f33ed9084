//! Batch processing command

use crate::{BatchArgs, BatchOp};
use anyhow::{Context, Result, bail};
use pixmap_ops::{ForkJoin, Operation};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, trace, warn};

pub fn run(args: BatchArgs, verbose: u8, engine: &ForkJoin) -> Result<()> {
    let op = operation(&args);
    trace!(pattern = %args.pattern, op = %op, "batch::run");

    let files: Vec<PathBuf> = glob::glob(&args.pattern)
        .with_context(|| format!("Invalid pattern: {}", args.pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        bail!("No files match pattern: {}", args.pattern);
    }

    info!(files = files.len(), pattern = %args.pattern, op = %op, "Starting batch processing");

    if verbose > 0 {
        println!("Found {} files matching '{}'", files.len(), args.pattern);
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create: {}", args.output_dir.display()))?;

    let results = process_files(&files, engine, |input| {
        let output = output_path(input, &args.output_dir);
        super::apply_file(op, input, &output, engine, verbose)
    });

    let mut success = 0;
    let mut failed = 0;
    for (input, r) in results {
        match r {
            Ok(()) => success += 1,
            Err(e) => {
                failed += 1;
                warn!(input = %input.display(), "{e:#}");
                eprintln!("Error: {e:#}");
            }
        }
    }

    info!(success, failed, "Batch processing complete");
    println!("Processed: {} success, {} failed", success, failed);

    if failed > 0 {
        bail!("{} files failed", failed);
    }

    Ok(())
}

/// Runs `f` on every file concurrently, inside the engine's pool so `-j`
/// bounds the file-level fan-out as well as each transform.
fn process_files<'a, F>(
    files: &'a [PathBuf],
    engine: &ForkJoin,
    f: F,
) -> Vec<(&'a PathBuf, Result<()>)>
where
    F: Fn(&Path) -> Result<()> + Sync,
{
    engine.install(|| {
        files
            .par_iter()
            .map(|input| (input, f(input.as_path())))
            .collect()
    })
}

fn operation(args: &BatchArgs) -> Operation {
    match args.op {
        BatchOp::Negate => Operation::Negate,
        BatchOp::Greyscale => Operation::Greyscale,
        BatchOp::Mirror => Operation::Mirror,
        BatchOp::Blur => Operation::GaussianBlur {
            radius: args.radius,
            sigma: args.sigma,
        },
    }
}

/// `<out_dir>/<stem>.ppm`
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{stem}.ppm"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{load_image, save_image};
    use pixmap_core::{PixelBuffer, Rgb};

    fn args(pattern: String, output_dir: PathBuf, op: BatchOp) -> BatchArgs {
        BatchArgs {
            pattern,
            output_dir,
            op,
            radius: 1,
            sigma: 1.0,
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("in/frame.001.ppm"), Path::new("out")),
            PathBuf::from("out/frame.001.ppm")
        );
        assert_eq!(output_path(Path::new("raw"), Path::new("o")), PathBuf::from("o/raw.ppm"));
    }

    #[test]
    fn test_batch_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir(&src).unwrap();
        let img = PixelBuffer::from_fn(3, 2, 255, |x, y| Rgb::new(x as u8, y as u8, 0));
        for name in ["a.ppm", "b.ppm"] {
            save_image(&src.join(name), &img).unwrap();
        }

        let out = dir.path().join("out");
        let pattern = format!("{}/*.ppm", src.display());
        run(args(pattern, out.clone(), BatchOp::Mirror), 0, &ForkJoin::new(1).unwrap()).unwrap();

        for name in ["a.ppm", "b.ppm"] {
            let got = load_image(&out.join(name)).unwrap();
            assert_eq!(got.pixel(0, 1), img.pixel(2, 1));
        }
    }

    #[test]
    fn test_single_thread_processes_files_on_one_worker() {
        use std::collections::HashSet;
        use std::sync::Mutex;

        let files: Vec<PathBuf> = (0..64).map(|i| PathBuf::from(format!("f{i}.ppm"))).collect();
        let engine = crate::build_engine(4, 1).unwrap();
        let workers = Mutex::new(HashSet::new());
        let results = process_files(&files, &engine, |_| {
            workers.lock().unwrap().insert(rayon::current_thread_index());
            Ok(())
        });

        assert_eq!(results.len(), 64);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(workers.into_inner().unwrap(), HashSet::from([Some(0)]));
    }

    #[test]
    fn test_batch_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.ppm", dir.path().display());
        let err = run(
            args(pattern, dir.path().join("out"), BatchOp::Negate),
            0,
            &ForkJoin::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("No files match"));
    }

    #[test]
    fn test_batch_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.ppm"), b"P3\n1 1\n255\n").unwrap();
        let pattern = format!("{}/*.ppm", dir.path().display());
        let err = run(
            args(pattern, dir.path().join("out"), BatchOp::Greyscale),
            0,
            &ForkJoin::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "1 files failed");
    }
}
