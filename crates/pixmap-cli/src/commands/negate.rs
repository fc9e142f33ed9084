//! Negate command

use crate::IoArgs;
use anyhow::Result;
use pixmap_ops::{ForkJoin, Operation};
use tracing::trace;

pub fn run(args: IoArgs, verbose: u8, engine: &ForkJoin) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "negate::run");
    super::apply_file(Operation::Negate, &args.input, &args.output, engine, verbose)
}
