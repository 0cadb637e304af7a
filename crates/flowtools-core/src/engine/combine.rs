//! Combination of spread series from repeated runs into mean values with
//! standard errors.

use super::error::EngineError;
use crate::core::models::map::coordinates_match;
use crate::core::models::spread::{SpreadErrors, SpreadMetadata, SpreadRecord, SpreadSeries};
use tracing::{debug, warn};

/// How the time axes of series are aligned before combining them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSync {
    /// Keep times as they are.
    None,
    /// Shift every series so that its first record, the impact, is at zero.
    #[default]
    Impact,
    /// Shift every series so that zero is where its centre of mass first
    /// sinks to the lowest initial height among all series.
    Com,
}

/// The time by which each series is shifted to align it with the others.
pub fn sync_shifts(series: &[SpreadSeries], sync: TimeSync) -> Vec<f64> {
    match sync {
        TimeSync::None => vec![0.0; series.len()],
        TimeSync::Impact => series
            .iter()
            .map(|s| s.records().first().map_or(0.0, |r| r.time))
            .collect(),
        TimeSync::Com => {
            let lowest = series
                .iter()
                .filter_map(|s| s.records().first())
                .map(|r| r.dist)
                .fold(f64::INFINITY, f64::min);
            series
                .iter()
                .map(|s| {
                    s.records()
                        .iter()
                        .find(|r| r.dist <= lowest)
                        .map_or(0.0, |r| r.time)
                })
                .collect()
        }
    }
}

/// Mean and standard error `std / sqrt(n)` of a quantity, using the
/// population standard deviation.
fn mean_and_error(records: &[&SpreadRecord], get: impl Fn(&SpreadRecord) -> f64) -> (f64, f64) {
    let n = records.len() as f64;
    let mean = records.iter().map(|r| get(r)).sum::<f64>() / n;
    let variance = records.iter().map(|r| (get(r) - mean).powi(2)).sum::<f64>() / n;
    (mean, (variance / n).sqrt())
}

/// Combines series into one holding the mean and standard error of every
/// quantity, at the times present in all series after synchronisation.
///
/// # Errors
///
/// Returns [`EngineError::EmptyInput`] if no series are given.
pub fn combine_spreads(
    series: &[SpreadSeries],
    sync: TimeSync,
) -> Result<SpreadSeries, EngineError> {
    let first = series.first().ok_or(EngineError::EmptyInput("spread series"))?;
    let shifted: Vec<SpreadSeries> = series
        .iter()
        .zip(sync_shifts(series, sync))
        .map(|(s, shift)| s.shifted(shift))
        .collect();

    let mut records = Vec::new();
    for record in shifted[0].records() {
        let matching: Option<Vec<&SpreadRecord>> = shifted
            .iter()
            .map(|s| {
                s.records()
                    .iter()
                    .find(|r| coordinates_match(r.time, record.time))
            })
            .collect();
        let Some(matching) = matching else {
            continue;
        };

        let (left, left_error) = mean_and_error(&matching, |r| r.left);
        let (right, right_error) = mean_and_error(&matching, |r| r.right);
        let (com, com_error) = mean_and_error(&matching, |r| r.com);
        let (dist, dist_error) = mean_and_error(&matching, |r| r.dist);

        records.push(SpreadRecord {
            error: Some(SpreadErrors {
                left: left_error,
                right: right_error,
                com: com_error,
                dist: dist_error,
            }),
            ..SpreadRecord::new(record.time, left, right, com, dist)
        });
    }

    if records.is_empty() {
        warn!("The spread series share no common times.");
    }
    debug!(
        series = series.len(),
        records = records.len(),
        ?sync,
        "Combined spread series."
    );

    let metadata = SpreadMetadata {
        delta_t: first.metadata.delta_t,
        ..Default::default()
    };
    Ok(SpreadSeries::from_records(metadata, records))
}
