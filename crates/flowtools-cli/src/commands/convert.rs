use super::Context;
use crate::cli::ConvertArgs;
use crate::config::builder::Overrides;
use crate::error::Result;
use flowtools::engine::progress::ProgressReporter;
use flowtools::workflows::convert::{self, ConvertOptions};
use tracing::info;

pub fn run(args: ConvertArgs, ctx: &Context) -> Result<()> {
    let config = ctx.config(&Overrides::default().with_naming(&args.naming))?;
    let options = ConvertOptions {
        density: config.naming(&args.dens),
        flow: config.naming(&args.flow),
        output: config.naming(&args.output),
        start: args.frames.start,
        end: args.frames.end,
        decumulate: args.decumulate,
    };

    let progress_handler = ctx.progress();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Converting legacy maps of '{}'...", args.dens);
    info!("Invoking the conversion workflow...");
    let written = convert::run(&options, &reporter)?;

    println!(
        "✓ Wrote {} converted map(s) under '{}'.",
        written.len(),
        args.output
    );
    Ok(())
}
