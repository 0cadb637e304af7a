//! Spreading velocity of a spread series.
//!
//! Velocities are central differences of a spread quantity over `sample`
//! records to either side, smoothed by a running average over `average`
//! velocities to either side.

use super::config::ConfigError;
use super::error::EngineError;
use crate::core::models::spread::{SpreadRecord, SpreadSeries};

/// The quantity of a spread record whose rate of change is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadQuantity {
    Left,
    Right,
    Radius,
    #[default]
    Diameter,
}

impl SpreadQuantity {
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Radius => "radius",
            Self::Diameter => "diameter",
        }
    }

    pub fn value(self, record: &SpreadRecord) -> f64 {
        match self {
            Self::Left => record.left,
            Self::Right => record.right,
            Self::Radius => record.radius(),
            Self::Diameter => record.diameter(),
        }
    }
}

/// Which records keep a smoothed velocity near the ends of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Every record, averaged over the neighbours that exist.
    #[default]
    Full,
    /// Records averaged over as many neighbours on both sides. The first
    /// and last record have none and are left out.
    Equal,
    /// Only records with the full number of neighbours on both sides.
    Limited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityOptions {
    /// Velocities to either side in the running average.
    pub average: usize,
    /// Records to either side in each difference.
    pub sample: usize,
    pub window: Window,
}

impl Default for VelocityOptions {
    fn default() -> Self {
        Self {
            average: 5,
            sample: 1,
            window: Window::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityPoint {
    pub time: f64,
    pub velocity: f64,
}

fn at_least_one(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: "must be at least 1",
        });
    }
    Ok(())
}

/// The velocity of `quantity` at the times of the series.
///
/// # Errors
///
/// Fails for zero `average` or `sample` and for series of fewer than two records.
pub fn spread_velocity(
    series: &SpreadSeries,
    quantity: SpreadQuantity,
    options: &VelocityOptions,
) -> Result<Vec<VelocityPoint>, EngineError> {
    at_least_one("average", options.average)?;
    at_least_one("sample", options.sample)?;

    let records = series.records();
    let count = records.len();
    if count < 2 {
        return Err(EngineError::TooFewRecords {
            needed: 2,
            found: count,
        });
    }

    let last = count - 1;
    let raw: Vec<f64> = (0..count)
        .map(|i| {
            let lo = &records[i.saturating_sub(options.sample)];
            let hi = &records[(i + options.sample).min(last)];
            (quantity.value(hi) - quantity.value(lo)) / (hi.time - lo.time)
        })
        .collect();

    let points = (0..count)
        .filter_map(|i| {
            let reach = match options.window {
                Window::Equal => options.average.min(i).min(last - i),
                Window::Full | Window::Limited => options.average,
            };
            let (lo, hi) = (i.saturating_sub(reach), (i + reach).min(last));
            let complete = hi - lo == 2 * options.average;
            if reach == 0 || (options.window == Window::Limited && !complete) {
                return None;
            }
            let window = &raw[lo..=hi];
            Some(VelocityPoint {
                time: records[i].time,
                velocity: window.iter().sum::<f64>() / window.len() as f64,
            })
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::spread::SpreadMetadata;
    use approx::assert_relative_eq;

    fn series(radius: impl Fn(f64) -> f64, count: usize) -> SpreadSeries {
        let records = (0..count)
            .map(|i| {
                let time = i as f64;
                SpreadRecord::new(time, -radius(time), radius(time), 0.0, 0.0)
            })
            .collect();
        SpreadSeries::from_records(SpreadMetadata::default(), records)
    }

    fn velocities(points: &[VelocityPoint]) -> Vec<f64> {
        points.iter().map(|p| p.velocity).collect()
    }

    #[test]
    fn constant_spreading_has_constant_velocity() {
        let series = series(|t| 3.0 * t, 10);
        let points = spread_velocity(&series, SpreadQuantity::Diameter, &Default::default()).unwrap();
        assert_eq!(points.len(), 10);
        assert!(points.iter().all(|p| (p.velocity - 6.0).abs() < 1e-12));
        assert_relative_eq!(points[0].time, 0.0);

        let left = spread_velocity(&series, SpreadQuantity::Left, &Default::default()).unwrap();
        assert_relative_eq!(left[4].velocity, -3.0);
    }

    #[test]
    fn equal_window_averages_symmetrically_and_drops_the_ends() {
        let options = VelocityOptions {
            average: 1,
            sample: 1,
            window: Window::Equal,
        };
        let points = spread_velocity(&series(|t| t * t, 5), SpreadQuantity::Radius, &options).unwrap();
        assert_eq!(
            points.iter().map(|p| p.time).collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0]
        );
        let found = velocities(&points);
        assert_relative_eq!(found[0], 7.0 / 3.0);
        assert_relative_eq!(found[1], 4.0);
        assert_relative_eq!(found[2], 17.0 / 3.0);
    }

    #[test]
    fn limited_window_keeps_complete_averages_only() {
        let options = VelocityOptions {
            average: 2,
            window: Window::Limited,
            ..Default::default()
        };
        let points = spread_velocity(&series(|t| t, 10), SpreadQuantity::Radius, &options).unwrap();
        assert_eq!(points.first().map(|p| p.time), Some(2.0));
        assert_eq!(points.last().map(|p| p.time), Some(7.0));
        assert_eq!(points.len(), 6);
    }

    #[test]
    fn full_window_averages_what_exists_at_the_ends() {
        let options = VelocityOptions {
            average: 1,
            ..Default::default()
        };
        let points = spread_velocity(&series(|t| t * t, 5), SpreadQuantity::Radius, &options).unwrap();
        let found = velocities(&points);
        assert_eq!(found.len(), 5);
        assert_relative_eq!(found[0], 1.5);
        assert_relative_eq!(found[4], 6.5);
    }

    #[test]
    fn short_series_and_empty_windows_are_rejected() {
        assert_eq!(
            spread_velocity(&series(|t| t, 1), SpreadQuantity::Radius, &Default::default()),
            Err(EngineError::TooFewRecords {
                needed: 2,
                found: 1
            })
        );
        let options = VelocityOptions {
            sample: 0,
            ..Default::default()
        };
        assert!(matches!(
            spread_velocity(&series(|t| t, 4), SpreadQuantity::Radius, &options),
            Err(EngineError::Config { .. })
        ));
    }
}
