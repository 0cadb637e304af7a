use super::Context;
use crate::cli::AverageArgs;
use crate::config::builder::Overrides;
use crate::error::Result;
use flowtools::engine::aggregate::Aggregation;
use flowtools::engine::progress::ProgressReporter;
use flowtools::workflows::average::{self, AverageOptions};
use tracing::{info, warn};

pub fn run(args: AverageArgs, ctx: &Context) -> Result<()> {
    let config = ctx.config(&Overrides::default().with_naming(&args.naming))?;
    let options = AverageOptions {
        input: config.naming(&args.base),
        output: config.naming(&args.out),
        stride: args.number,
        start: args.frames.start,
        end: args.frames.end,
        mode: if args.sum {
            Aggregation::Sum
        } else {
            Aggregation::Mean
        },
    };

    let progress_handler = ctx.progress();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Averaging every {} map(s) of '{}'...", args.number, args.base);
    info!("Invoking the averaging workflow...");
    let summary = average::run(&options, &reporter)?;

    if summary.skipped > 0 {
        warn!(
            "{} map(s) after the last complete group were not averaged.",
            summary.skipped
        );
    }
    println!(
        "✓ Averaged {} map(s) into {} file(s) under '{}'.",
        summary.read - summary.skipped,
        summary.written.len(),
        args.out
    );
    Ok(())
}
