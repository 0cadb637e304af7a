use super::error::WorkflowError;
use super::read_map;
use crate::core::io::series::FrameNaming;
use crate::core::models::map::DataMap;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::plot::density::{DensityOptions, DensityPlot};
use crate::plot::error::PlotError;
use crate::plot::figure::{Figure, FigureOptions};
use crate::plot::flow::{FlowOptions, FlowPlot};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// The figure drawn of each map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapFigure {
    Flow(FlowOptions),
    Density(DensityOptions),
}

impl MapFigure {
    /// Whether the map has no droplet cells to draw.
    pub fn is_empty(&self, map: &DataMap) -> bool {
        match *self {
            MapFigure::Flow(options) => FlowPlot::new(map, options).arrows().is_empty(),
            MapFigure::Density(options) => DensityPlot::new(map, options).cells().is_empty(),
        }
    }

    /// Draws the figure of one map into the file at `path`.
    pub fn draw(
        &self,
        map: &DataMap,
        path: &Path,
        figure: &FigureOptions,
    ) -> Result<(), PlotError> {
        match *self {
            MapFigure::Flow(options) => Figure::draw(path, figure, &FlowPlot::new(map, options)),
            MapFigure::Density(options) => {
                Figure::draw(path, figure, &DensityPlot::new(map, options))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub input: FrameNaming,
    /// Naming of the image files, whose extension selects the image format.
    pub output: FrameNaming,
    pub start: u64,
    pub end: Option<u64>,
    pub kind: MapFigure,
    pub figure: FigureOptions,
}

/// Draws a figure of every map of a run, keeping the frame numbers of the maps.
///
/// Maps without droplet cells give no figure.
#[instrument(skip_all, name = "render_workflow")]
pub fn run(
    options: &RenderOptions,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, WorkflowError> {
    let files = options.input.discover(options.start, options.end);
    if files.is_empty() {
        return Err(WorkflowError::NoFrames(options.input.path(options.start)));
    }
    info!(maps = files.len(), "Drawing maps of '{}'.", options.input.base);

    reporter.report(Progress::PhaseStart {
        name: "Drawing maps",
    });
    let drawn = reporter.task(files.len() as u64, |i| -> Result<_, WorkflowError> {
        let file = &files[i as usize];
        let map = read_map(&file.path)?;
        if options.kind.is_empty(&map) {
            warn!(path = %file.path.display(), "No droplet cells to draw, skipping map.");
            return Ok(None);
        }
        let path = options.output.path(file.number);
        options
            .kind
            .draw(&map, &path, &options.figure)
            .map_err(|source| WorkflowError::Plot {
                path: path.clone(),
                source,
            })?;
        Ok(Some(path))
    });
    reporter.report(Progress::PhaseFinish);
    let written: Vec<PathBuf> = drawn?.into_iter().flatten().collect();

    info!("Drew {} figure(s).", written.len());
    Ok(written)
}
