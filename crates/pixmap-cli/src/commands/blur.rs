//! Blur command

use crate::{BlurArgs, BlurKind};
use anyhow::Result;
use pixmap_ops::{ForkJoin, Operation};
use tracing::trace;

pub fn run(args: BlurArgs, verbose: u8, engine: &ForkJoin) -> Result<()> {
    trace!(radius = args.radius, sigma = args.sigma, kind = ?args.kind, "blur::run");
    super::apply_file(operation(&args), &args.input, &args.output, engine, verbose)
}

fn operation(args: &BlurArgs) -> Operation {
    match args.kind {
        BlurKind::Gaussian => Operation::GaussianBlur {
            radius: args.radius,
            sigma: args.sigma,
        },
        BlurKind::Box => Operation::BoxBlur { radius: args.radius },
    }
}
