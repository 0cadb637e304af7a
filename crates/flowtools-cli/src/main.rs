mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::Context;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("flowtools v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let ctx = Context {
        config: cli.config,
        set_values: cli.set_values,
        quiet: cli.quiet,
    };

    let command_result = match cli.command {
        Commands::Average(args) => {
            info!("Dispatching to 'average' command.");
            commands::average::run(args, &ctx)
        }
        Commands::Aggregate(args) => {
            info!("Dispatching to 'aggregate' command.");
            commands::aggregate::run(args)
        }
        Commands::Convert(args) => {
            info!("Dispatching to 'convert' command.");
            commands::convert::run(args, &ctx)
        }
        Commands::Coarsen(args) => {
            info!("Dispatching to 'coarsen' command.");
            commands::coarsen::run(args)
        }
        Commands::Cut(args) => {
            info!("Dispatching to 'cut' command.");
            commands::cut::run(args)
        }
        Commands::Spread(args) => {
            info!("Dispatching to 'spread' command.");
            commands::spread::run(args, &ctx)
        }
        Commands::CombineSpread(args) => {
            info!("Dispatching to 'combine-spread' command.");
            commands::combine_spread::run(args)
        }
        Commands::SpreadVelocity(args) => {
            info!("Dispatching to 'spread-velocity' command.");
            commands::spread_velocity::run(args, &ctx)
        }
        Commands::Retime(args) => {
            info!("Dispatching to 'retime' command.");
            commands::retime::run(args)
        }
        Commands::Profile(args) => {
            info!("Dispatching to 'profile' command.");
            commands::profile::run(args, &ctx)
        }
        Commands::Plot(args) => {
            info!("Dispatching to 'plot' command.");
            commands::plot::run(args, &ctx)
        }
        Commands::Print(args) => commands::print::run(args, &ctx),
        Commands::Info(args) => commands::info::run(args),
    };

    match &command_result {
        Ok(()) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}
