use super::error::WorkflowError;
use super::read_map;
use crate::core::io::series::FrameNaming;
use crate::core::models::frame::Frame;
use crate::core::models::spread::{SpreadMetadata, SpreadSeries};
use crate::engine::config::{ConfigError, SpreadConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::spread::SpreadCollector;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct CollectOptions {
    pub input: FrameNaming,
    pub start: u64,
    pub end: Option<u64>,
    /// Time between consecutive frames. The `k`-th map read, counting from
    /// one at `start`, is at time `k * delta_t`.
    pub delta_t: f64,
    pub config: SpreadConfig,
}

/// Collects the spreading of a droplet through the maps of a run.
///
/// Maps are read one at a time.
#[instrument(skip_all, name = "spread_workflow")]
pub fn run(
    options: &CollectOptions,
    reporter: &ProgressReporter,
) -> Result<SpreadSeries, WorkflowError> {
    if !(options.delta_t.is_finite() && options.delta_t > 0.0) {
        return Err(EngineError::from(ConfigError::InvalidParameter {
            name: "delta_t",
            value: options.delta_t.to_string(),
            reason: "must be a positive number",
        })
        .into());
    }

    let files = options.input.discover(options.start, options.end);
    if files.is_empty() {
        return Err(WorkflowError::NoFrames(options.input.path(options.start)));
    }
    info!(
        maps = files.len(),
        floor = options.config.floor,
        "Collecting spread of '{}'.",
        options.input.base
    );

    let mut collector = SpreadCollector::new(options.config)?;
    reporter.report(Progress::PhaseStart {
        name: "Collecting spread",
    });
    let collected = reporter.task(files.len() as u64, |i| {
        let file = &files[i as usize];
        let frame = Frame::new((i + 1) as f64 * options.delta_t, read_map(&file.path)?);
        collector
            .push(&frame)
            .map_err(|source| WorkflowError::Frame {
                path: file.path.clone(),
                source,
            })
    });
    reporter.report(Progress::PhaseFinish);
    collected?;

    let metadata = SpreadMetadata {
        base: Some(options.input.base.clone()),
        delta_t: Some(options.delta_t),
        ..Default::default()
    };
    let series = collector.finish(metadata)?;
    info!("Collected spread in {} frame(s).", series.len());
    Ok(series)
}
