//! Flow profile of a map along y.

use crate::core::models::map::DataMap;
use nalgebra::{Matrix2, Vector2};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfileOptions {
    /// Cells must carry more than this mass to count.
    pub min_mass: f64,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

/// Mean flow along x of the counted cells of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub height: f64,
    pub flow: f64,
}

/// The flow profile of a map from the bottom row up.
///
/// Rows outside the height limits or without flow along x are left out.
pub fn velocity_profile(map: &DataMap, options: &ProfileOptions) -> Vec<ProfilePoint> {
    map.cells()
        .outer_iter()
        .enumerate()
        .filter_map(|(row, cells)| {
            let height = map.y(row)?;
            let inside = options.y_min.is_none_or(|min| height >= min)
                && options.y_max.is_none_or(|max| height <= max);

            let (flow, counted) = cells
                .iter()
                .filter(|cell| cell.mass > options.min_mass)
                .fold((0.0, 0usize), |(flow, counted), cell| {
                    (flow + cell.flow.x, counted + 1)
                });

            (inside && flow != 0.0).then(|| ProfilePoint {
                height,
                flow: flow / counted as f64,
            })
        })
        .collect()
}

/// Flow as a straight line of height, `flow = intercept + slope * height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    pub fn flow_at(&self, height: f64) -> f64 {
        self.intercept + self.slope * height
    }
}

/// Least squares fit of a line through the profile.
///
/// Returns `None` for fewer than two points.
pub fn fit_linear(profile: &[ProfilePoint]) -> Option<LinearFit> {
    if profile.len() < 2 {
        return None;
    }

    let (normal, moments) = profile.iter().fold(
        (Matrix2::<f64>::zeros(), Vector2::<f64>::zeros()),
        |(normal, moments), point| {
            let h = point.height;
            (
                normal + Matrix2::new(1.0, h, h, h * h),
                moments + Vector2::new(point.flow, h * point.flow),
            )
        },
    );
    let solution = normal.lu().solve(&moments)?;

    Some(LinearFit {
        intercept: solution[0],
        slope: solution[1],
    })
}
