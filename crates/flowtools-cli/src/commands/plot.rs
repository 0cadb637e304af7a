use super::{Context, figure_options, read_map};
use crate::cli::{
    DensityPlotArgs, FlowPlotArgs, MapInputArgs, PlotArgs, PlotCommands, SpreadPlotArgs,
};
use crate::config::builder::Overrides;
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use flowtools::core::io::spread::SpreadFile;
use flowtools::core::io::traits::DataFile;
use flowtools::core::models::spread::SpreadSeries;
use flowtools::engine::progress::ProgressReporter;
use flowtools::plot::colour::parse_colour;
use flowtools::plot::density::DensityOptions;
use flowtools::plot::error::PlotError;
use flowtools::plot::figure::{Figure, FigureOptions};
use flowtools::plot::flow::{ArrowColour, FlowOptions};
use flowtools::plot::spread::{SpreadKind, SpreadOptions, SpreadPlot};
use flowtools::workflows::render::{self, MapFigure, RenderOptions};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: PlotArgs, ctx: &Context) -> Result<()> {
    match args.command {
        PlotCommands::Flow(args) => {
            info!("Dispatching to 'plot flow'.");
            flow(args, ctx)
        }
        PlotCommands::Density(args) => {
            info!("Dispatching to 'plot density'.");
            density(args, ctx)
        }
        PlotCommands::Spread(args) => {
            info!("Dispatching to 'plot spread'.");
            spread(args, ctx)
        }
    }
}

fn flow(args: FlowPlotArgs, ctx: &Context) -> Result<()> {
    let overrides = Overrides {
        scale: args.scale,
        colour: args.colour.clone(),
        ..Overrides::default()
            .with_naming(&args.input.naming)
            .with_droplet(&args.droplet)
            .with_figure(&args.figure)?
    };
    let config = ctx.config(&overrides)?;

    let colour = if args.temp {
        ArrowColour::Temperature {
            min: args.t_min,
            max: args.t_max,
        }
    } else {
        ArrowColour::Fixed(config.plot.colour)
    };
    let kind = MapFigure::Flow(FlowOptions {
        droplet: config.droplet,
        scale: config.plot.scale,
        colour,
    });
    let figure = figure_options(&args.figure, &config);
    draw_maps(&args.input, kind, figure, &config, ctx)
}

fn density(args: DensityPlotArgs, ctx: &Context) -> Result<()> {
    let overrides = Overrides::default()
        .with_naming(&args.input.naming)
        .with_droplet(&args.droplet)
        .with_figure(&args.figure)?;
    let config = ctx.config(&overrides)?;

    if let Some(norm) = args.norm.filter(|n| !(n.is_finite() && *n > 0.0)) {
        return Err(CliError::Argument(format!(
            "--norm must be a positive number, got {norm}"
        )));
    }
    let kind = MapFigure::Density(DensityOptions {
        droplet: config.droplet,
        norm: args.norm,
    });
    let figure = figure_options(&args.figure, &config);
    draw_maps(&args.input, kind, figure, &config, ctx)
}

/// Draws a single map file, or every map of a run when the input is a file name base.
fn draw_maps(
    input: &MapInputArgs,
    kind: MapFigure,
    figure: FigureOptions,
    config: &AppConfig,
    ctx: &Context,
) -> Result<()> {
    let path = Path::new(&input.input);
    if path.is_file() {
        let save = PathBuf::from(&input.save);
        let map = read_map(path)?;
        if kind.is_empty(&map) {
            return Err(CliError::Plot {
                path: save,
                source: PlotError::NoData("no droplet cells"),
            });
        }
        info!("Drawing {:?} to {:?}", path, save);
        kind.draw(&map, &save, &figure)
            .map_err(|source| CliError::Plot {
                path: save.clone(),
                source,
            })?;
        println!("✓ Figure written to: {}", save.display());
        return Ok(());
    }

    let options = RenderOptions {
        input: config.naming(&input.input),
        output: config.image_naming(&input.save),
        start: input.frames.start,
        end: input.frames.end,
        kind,
        figure,
    };
    let progress_handler = ctx.progress();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Drawing maps of '{}'...", input.input);
    let written = render::run(&options, &reporter)?;
    println!(
        "✓ Wrote {} figure(s) under '{}'.",
        written.len(),
        input.save
    );
    Ok(())
}

fn spread(args: SpreadPlotArgs, ctx: &Context) -> Result<()> {
    let overrides = Overrides {
        sigma: args.sigma,
        ..Overrides::default().with_figure(&args.figure)?
    };
    let config = ctx.config(&overrides)?;

    let series = args
        .files
        .iter()
        .map(|path| {
            let series =
                SpreadFile::read_from_path(path).map_err(|source| CliError::Spread {
                    path: path.clone(),
                    source,
                })?;
            Ok(if args.relative {
                relative(&series)
            } else {
                series
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let colours = args
        .colours
        .iter()
        .map(|name| parse_colour(name).map_err(|e| CliError::Argument(e.to_string())))
        .collect::<Result<Vec<_>>>()?;
    let options = SpreadOptions {
        kind: if args.radius {
            SpreadKind::Radius
        } else {
            SpreadKind::Edges
        },
        sigma: (!args.noerror).then_some(config.plot.sigma),
        colours,
        labels: args.labels.clone(),
    };
    let figure = figure_options(&args.figure, &config);

    info!(series = series.len(), "Drawing spread to {:?}", args.save);
    Figure::draw(&args.save, &figure, &SpreadPlot::new(&series, options)).map_err(|source| {
        CliError::Plot {
            path: args.save.clone(),
            source,
        }
    })?;
    println!("✓ Figure written to: {}", args.save.display());
    Ok(())
}

/// Shifts a series so that its first record is at time zero.
fn relative(series: &SpreadSeries) -> SpreadSeries {
    let start = series.records().first().map_or(0.0, |r| r.time);
    series.shifted(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtools::core::models::spread::{SpreadMetadata, SpreadRecord};

    #[test]
    fn relative_series_starts_at_zero() {
        let series = SpreadSeries::from_records(
            SpreadMetadata::default(),
            vec![
                SpreadRecord::new(40.0, 0.0, 2.0, 1.0, 1.0),
                SpreadRecord::new(50.0, 0.0, 4.0, 1.0, 1.0),
            ],
        );
        assert_eq!(relative(&series).times(), vec![0.0, 10.0]);
        assert!(relative(&SpreadSeries::new(SpreadMetadata::default())).is_empty());
    }
}
