use super::config::{ConfigError, DropletConfig, SpreadConfig};
use super::droplet::{center_of_mass, detect};
use super::error::EngineError;
use crate::core::models::frame::Frame;
use crate::core::models::spread::{SpreadMetadata, SpreadRecord, SpreadSeries};
use tracing::{debug, info, warn};

const TIME_TOLERANCE: f64 = 1e-9;

/// Checks that consecutive frame times are strictly increasing and equidistant.
#[derive(Debug, Default)]
struct TimeAxis {
    first: Option<f64>,
    step: Option<f64>,
    count: usize,
}

impl TimeAxis {
    fn push(&mut self, time: f64) -> Result<(), EngineError> {
        let index = self.count;
        match (self.first, self.step) {
            (None, _) => self.first = Some(time),
            (Some(first), None) => {
                if time <= first {
                    return Err(EngineError::NotIncreasing {
                        index,
                        previous: first,
                        found: time,
                    });
                }
                self.step = Some(time - first);
            }
            (Some(first), Some(step)) => {
                let expected = first + step * index as f64;
                let tolerance = TIME_TOLERANCE * expected.abs().max(step);
                if (time - expected).abs() > tolerance {
                    return Err(EngineError::NotEquidistant {
                        index,
                        expected,
                        found: time,
                    });
                }
            }
        }
        self.count += 1;
        Ok(())
    }
}

/// Collects the spreading of a droplet frame by frame.
///
/// Frames before impact, i.e. without droplet cells in the floor row, add no
/// record. Only one frame needs to be held in memory at a time.
#[derive(Debug)]
pub struct SpreadCollector {
    config: SpreadConfig,
    times: TimeAxis,
    impact_com: Option<f64>,
    records: Vec<SpreadRecord>,
}

impl SpreadCollector {
    pub fn new(config: SpreadConfig) -> Result<Self, EngineError> {
        config.droplet.validate()?;
        Ok(Self {
            config,
            times: TimeAxis::default(),
            impact_com: None,
            records: Vec::new(),
        })
    }

    /// Adds the next frame of the series.
    ///
    /// # Errors
    ///
    /// Fails if the frame is not equidistant in time to the previous frames
    /// or the floor row lies outside of its map.
    pub fn push(&mut self, frame: &Frame) -> Result<(), EngineError> {
        self.times.push(frame.time())?;

        let map = frame.map();
        let floor = self.config.floor;
        let floor_y = map.y(floor).ok_or(EngineError::FloorOutOfRange {
            floor,
            rows: map.rows(),
        })?;

        let mask = detect(map, &self.config.droplet);
        let Some((left, right)) = mask.edges(floor) else {
            debug!(time = frame.time(), "No droplet cells in floor row.");
            return Ok(());
        };
        let Some(com) = center_of_mass(map, &mask) else {
            warn!(time = frame.time(), "Droplet cells carry no mass, skipping frame.");
            return Ok(());
        };

        let impact_com = match self.impact_com {
            Some(x) => x,
            None => {
                // Edges are measured from the centre of the whole droplet at impact.
                let whole = detect(map, &DropletConfig::default());
                let x = center_of_mass(map, &whole).map_or(com.x, |point| point.x);
                info!(time = frame.time(), com = x, "Droplet impact.");
                *self.impact_com.insert(x)
            }
        };

        let half_width = map.info().cell_size.x / 2.0;
        let (Some(left_x), Some(right_x)) = (map.x(left), map.x(right)) else {
            return Ok(());
        };
        self.records.push(SpreadRecord::new(
            frame.time(),
            left_x - half_width - impact_com,
            right_x + half_width - impact_com,
            com.x,
            com.y - floor_y,
        ));
        Ok(())
    }

    /// Finishes collection, returning the records in frame order.
    ///
    /// # Errors
    ///
    /// Fails if no frame was added.
    pub fn finish(self, metadata: SpreadMetadata) -> Result<SpreadSeries, EngineError> {
        if self.times.count == 0 {
            return Err(EngineError::EmptyInput("frames"));
        }
        if self.records.is_empty() {
            warn!("The droplet never reached the floor row, no spreading was collected.");
        }
        let mut metadata = metadata;
        metadata.floor = Some(self.config.floor);
        metadata.min_mass = Some(self.config.droplet.min_mass);
        if metadata.delta_t.is_none() {
            metadata.delta_t = self.times.step;
        }
        Ok(SpreadSeries::from_records(metadata, self.records))
    }
}

/// Collects the spreading of a droplet through an ordered series of frames.
pub fn collect(
    frames: &[Frame],
    config: &SpreadConfig,
    metadata: SpreadMetadata,
) -> Result<SpreadSeries, EngineError> {
    let mut collector = SpreadCollector::new(*config)?;
    for frame in frames {
        collector.push(frame)?;
    }
    collector.finish(metadata)
}

/// Changes the time step of a collected series.
///
/// Each record keeps its frame, `time / delta_t` of the series, and moves
/// to that frame's time under the new step. With `start` set, times are
/// shifted so that the first record lies at `start`.
///
/// # Errors
///
/// Fails if the series does not know its time step or `delta_t` is not positive.
pub fn retime(
    series: &SpreadSeries,
    delta_t: f64,
    start: Option<f64>,
) -> Result<SpreadSeries, EngineError> {
    if !(delta_t.is_finite() && delta_t > 0.0) {
        return Err(ConfigError::InvalidParameter {
            name: "delta_t",
            value: delta_t.to_string(),
            reason: "must be a positive number",
        }
        .into());
    }
    let previous = series
        .metadata
        .delta_t
        .filter(|dt| *dt > 0.0)
        .ok_or(ConfigError::MissingParameter("delta_t"))?;

    let records = series
        .records()
        .iter()
        .map(|r| SpreadRecord {
            time: (r.time / previous).round() * delta_t,
            ..*r
        })
        .collect();
    let mut metadata = series.metadata.clone();
    metadata.delta_t = Some(delta_t);
    let retimed = SpreadSeries::from_records(metadata, records);

    let shift = match (start, retimed.records().first()) {
        (Some(start), Some(first)) => first.time - start,
        _ => 0.0,
    };
    debug!(previous, delta_t, shift, "Retimed spread series.");
    Ok(retimed.shifted(shift))
}
