use super::error::WorkflowError;
use super::write_map;
use crate::core::io::legacy::{DensityMapFile, FlowMapFile};
use crate::core::io::series::{FrameFile, FrameNaming};
use crate::core::io::traits::DataFile;
use crate::core::io::MapFormatError;
use crate::core::models::map::DataMap;
use crate::engine::legacy::{decumulate, merge};
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub density: FrameNaming,
    pub flow: FrameNaming,
    pub output: FrameNaming,
    pub start: u64,
    pub end: Option<u64>,
    /// The legacy maps hold sums since the start of the simulation, which
    /// are split into single frames. The first frame is kept as it is.
    pub decumulate: bool,
}

fn read_legacy<F: DataFile<Error = MapFormatError>>(
    path: &Path,
) -> Result<F::Content, WorkflowError> {
    debug!(path = %path.display(), "Reading legacy map.");
    F::read_from_path(path).map_err(|source| WorkflowError::ReadMap {
        path: path.to_path_buf(),
        source,
    })
}

fn convert_frame(options: &ConvertOptions, file: &FrameFile) -> Result<DataMap, WorkflowError> {
    let density = read_legacy::<DensityMapFile>(&file.path)?;
    let flow_path = options.flow.path(file.number);
    let flow = read_legacy::<FlowMapFile>(&flow_path)?;
    merge(&density, &flow).map_err(|source| WorkflowError::Frame {
        path: file.path.clone(),
        source,
    })
}

/// Merges the legacy density and flow maps of a run into current maps.
///
/// Output maps keep the frame numbers of their density maps.
#[instrument(skip_all, name = "convert_workflow")]
pub fn run(
    options: &ConvertOptions,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, WorkflowError> {
    let files = options.density.discover(options.start, options.end);
    if files.is_empty() {
        return Err(WorkflowError::NoFrames(options.density.path(options.start)));
    }
    info!(
        maps = files.len(),
        decumulate = options.decumulate,
        "Converting legacy maps of '{}'.",
        options.density.base
    );

    reporter.report(Progress::PhaseStart {
        name: "Converting maps",
    });
    let mut previous: Option<DataMap> = None;
    let written = reporter.task(files.len() as u64, |i| {
        let file = &files[i as usize];
        let merged = convert_frame(options, file)?;

        let map = if options.decumulate {
            let map = match &previous {
                Some(prev) => decumulate(&merged, prev).map_err(|source| WorkflowError::Frame {
                    path: file.path.clone(),
                    source,
                })?,
                None => merged.clone(),
            };
            previous = Some(merged);
            map
        } else {
            merged
        };

        let path = options.output.path(file.number);
        write_map(&map, &path)?;
        Ok::<_, WorkflowError>(path)
    });
    reporter.report(Progress::PhaseFinish);
    let written = written?;

    info!("Wrote {} converted map(s).", written.len());
    Ok(written)
}
