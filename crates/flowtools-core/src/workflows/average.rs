use super::error::WorkflowError;
use super::{read_map, write_map};
use crate::core::io::series::FrameNaming;
use crate::engine::aggregate::{Aggregation, aggregate};
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AverageOptions {
    pub input: FrameNaming,
    pub output: FrameNaming,
    /// Number of consecutive maps combined into one.
    pub stride: usize,
    pub start: u64,
    pub end: Option<u64>,
    pub mode: Aggregation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageSummary {
    pub read: usize,
    /// Maps left over after the last complete group.
    pub skipped: usize,
    pub written: Vec<PathBuf>,
}

/// Averages every `stride` consecutive maps of a run into one map.
///
/// Output maps are numbered from 1. Maps which do not fill a complete group
/// at the end of the run are not used.
#[instrument(skip_all, name = "average_workflow")]
pub fn run(
    options: &AverageOptions,
    reporter: &ProgressReporter,
) -> Result<AverageSummary, WorkflowError> {
    if options.stride == 0 {
        return Err(EngineError::from(ConfigError::InvalidParameter {
            name: "stride",
            value: options.stride.to_string(),
            reason: "at least one map must be averaged",
        })
        .into());
    }

    let files = options.input.discover(options.start, options.end);
    if files.is_empty() {
        return Err(WorkflowError::NoFrames(options.input.path(options.start)));
    }

    let groups: Vec<_> = files.chunks_exact(options.stride).collect();
    let skipped = files.len() % options.stride;
    if skipped > 0 {
        warn!(
            skipped,
            stride = options.stride,
            "Maps at the end of the run do not fill a complete group and are skipped."
        );
    }
    info!(
        maps = files.len(),
        groups = groups.len(),
        "Averaging maps of '{}'.",
        options.input.base
    );

    reporter.report(Progress::PhaseStart {
        name: "Averaging maps",
    });
    let written = reporter.task(groups.len() as u64, |i| {
        let group = groups[i as usize];
        let maps = group
            .iter()
            .map(|file| read_map(&file.path))
            .collect::<Result<Vec<_>, _>>()?;
        let averaged = aggregate(&maps, options.mode).map_err(|source| WorkflowError::Frame {
            path: group[0].path.clone(),
            source,
        })?;

        let path = options.output.path(i + 1);
        write_map(&averaged, &path)?;
        Ok::<_, WorkflowError>(path)
    });
    reporter.report(Progress::PhaseFinish);
    let written = written?;

    info!("Wrote {} averaged map(s).", written.len());
    Ok(AverageSummary {
        read: files.len() - skipped,
        skipped,
        written,
    })
}
