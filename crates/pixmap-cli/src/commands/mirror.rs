//! Mirror command

use crate::MirrorArgs;
use anyhow::Result;
use pixmap_ops::{ForkJoin, Operation};
use tracing::trace;

pub fn run(args: MirrorArgs, verbose: u8, engine: &ForkJoin) -> Result<()> {
    trace!(input = %args.input.display(), indexed = args.indexed, "mirror::run");
    let op = if args.indexed {
        Operation::MirrorIndexed
    } else {
        Operation::Mirror
    };
    super::apply_file(op, &args.input, &args.output, engine, verbose)
}
