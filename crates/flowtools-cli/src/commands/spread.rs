use super::Context;
use crate::cli::SpreadArgs;
use crate::config::builder::Overrides;
use crate::error::{CliError, Result};
use flowtools::core::io::spread::{SpreadFile, write_csv_to_path};
use flowtools::core::io::traits::DataFile;
use flowtools::core::models::spread::SpreadSeries;
use flowtools::engine::config::SpreadConfigBuilder;
use flowtools::engine::error::EngineError;
use flowtools::engine::progress::ProgressReporter;
use flowtools::workflows::spread::{self, CollectOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolves `path` against the directory of the file name base `base`.
fn relative_to_base(base: &str, path: &Path) -> PathBuf {
    match Path::new(base).parent() {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

pub fn run(args: SpreadArgs, ctx: &Context) -> Result<()> {
    let overrides = Overrides {
        delta_t: args.delta_t,
        ..Overrides::default()
            .with_naming(&args.naming)
            .with_droplet(&args.droplet)
    };
    let config = ctx.config(&overrides)?;

    let spread_config = SpreadConfigBuilder::new()
        .floor(args.floor)
        .min_mass(config.droplet.min_mass)
        .columns(config.droplet.columns)
        .build()
        .map_err(EngineError::from)?;
    let options = CollectOptions {
        input: config.naming(&args.base),
        start: args.frames.start,
        end: args.frames.end,
        delta_t: config.delta_t,
        config: spread_config,
    };

    let (save, csv) = if args.relative {
        (
            relative_to_base(&args.base, &args.save),
            args.csv.as_deref().map(|p| relative_to_base(&args.base, p)),
        )
    } else {
        (args.save.clone(), args.csv.clone())
    };

    let progress_handler = ctx.progress();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Collecting spread of '{}' at floor row {}...", args.base, args.floor);
    info!("Invoking the spread workflow...");
    let series = spread::run(&options, &reporter)?;

    write_series(&series, &save, csv.as_deref())?;
    println!(
        "✓ Spread of {} frame(s) written to: {}",
        series.len(),
        save.display()
    );
    Ok(())
}

pub(super) fn read_series(path: &Path) -> Result<SpreadSeries> {
    info!("Reading spread from {:?}", path);
    SpreadFile::read_from_path(path).map_err(|source| CliError::Spread {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a series as a spread file and, if asked, as CSV.
pub(super) fn write_series(series: &SpreadSeries, save: &Path, csv: Option<&Path>) -> Result<()> {
    info!("Writing spread to {:?}", save);
    SpreadFile::write_to_path(series, save).map_err(|source| CliError::Spread {
        path: save.to_path_buf(),
        source,
    })?;

    if let Some(csv) = csv {
        info!("Exporting spread as CSV to {:?}", csv);
        write_csv_to_path(series, csv).map_err(|source| CliError::Spread {
            path: csv.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
