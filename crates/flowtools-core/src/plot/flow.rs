use super::colour::Colormap;
use super::error::{PlotError, drawing_error};
use super::figure::{FigureOptions, Render, cartesian, padded};
use crate::core::models::map::DataMap;
use crate::engine::config::DropletConfig;
use crate::engine::droplet::detect;
use nalgebra::{Point2, Rotation2, Vector2};
use plotters::coord::Shift;
use plotters::prelude::*;

const HEAD_FRACTION: f64 = 0.3;
const HEAD_ANGLE: f64 = std::f64::consts::PI / 7.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowColour {
    Fixed(RGBColor),
    /// Coloured by cell temperature. Unset bounds are taken from the drawn cells.
    Temperature { min: Option<f64>, max: Option<f64> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowOptions {
    pub droplet: DropletConfig,
    /// Length of an arrow per unit of flow velocity.
    pub scale: f64,
    pub colour: ArrowColour,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            droplet: DropletConfig::default(),
            scale: 1.0,
            colour: ArrowColour::Fixed(BLUE),
        }
    }
}

/// The flow of one cell, drawn from the cell centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub temperature: f64,
}

impl Arrow {
    /// The barbs and tip of the arrow head, as a polyline.
    pub fn head(&self) -> [(f64, f64); 3] {
        let back = (self.start - self.end) * HEAD_FRACTION;
        let left = self.end + Rotation2::new(HEAD_ANGLE) * back;
        let right = self.end + Rotation2::new(-HEAD_ANGLE) * back;
        [(left.x, left.y), (self.end.x, self.end.y), (right.x, right.y)]
    }
}

/// A quiver plot of the flow of droplet cells.
pub struct FlowPlot<'a> {
    map: &'a DataMap,
    options: FlowOptions,
}

impl<'a> FlowPlot<'a> {
    pub fn new(map: &'a DataMap, options: FlowOptions) -> Self {
        Self { map, options }
    }

    pub fn arrows(&self) -> Vec<Arrow> {
        let mask = detect(self.map, &self.options.droplet);
        self.map
            .cells()
            .indexed_iter()
            .filter(|((row, column), _)| mask.contains(*row, *column))
            .map(|(_, cell)| Arrow {
                start: cell.position,
                end: cell.position + cell.flow * self.options.scale,
                temperature: cell.temperature,
            })
            .collect()
    }

    fn colormap(&self, arrows: &[Arrow], min: Option<f64>, max: Option<f64>) -> Colormap {
        let temperatures = arrows.iter().map(|a| a.temperature);
        let min = min.unwrap_or_else(|| temperatures.clone().fold(f64::INFINITY, f64::min));
        let max = max.unwrap_or_else(|| temperatures.fold(f64::NEG_INFINITY, f64::max));
        Colormap::temperature(min, max)
    }
}

impl Render for FlowPlot<'_> {
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        options: &FigureOptions,
    ) -> Result<(), PlotError> {
        let arrows = self.arrows();
        if arrows.is_empty() {
            return Err(PlotError::NoData("no droplet cells with flow"));
        }

        let info = self.map.info();
        let half = Vector2::new(info.cell_size.x, info.cell_size.y) / 2.0;
        let range = (
            padded(info.origin.x - half.x, info.end.x + half.x, 0.0),
            padded(info.origin.y - half.y, info.end.y + half.y, 0.0),
        );
        let mut chart = cartesian(area, options, range, ("x (nm)", "y (nm)"))?;

        let colour_of: Box<dyn Fn(&Arrow) -> RGBColor> = match self.options.colour {
            ArrowColour::Fixed(colour) => Box::new(move |_| colour),
            ArrowColour::Temperature { min, max } => {
                let colormap = self.colormap(&arrows, min, max);
                Box::new(move |arrow| colormap.colour(arrow.temperature))
            }
        };

        chart
            .draw_series(arrows.iter().map(|arrow| {
                PathElement::new(
                    vec![(arrow.start.x, arrow.start.y), (arrow.end.x, arrow.end.y)],
                    colour_of(arrow).stroke_width(1),
                )
            }))
            .map_err(drawing_error)?;
        chart
            .draw_series(arrows.iter().map(|arrow| {
                PathElement::new(arrow.head().to_vec(), colour_of(arrow).stroke_width(1))
            }))
            .map_err(drawing_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::map::test_utils::grid_map;
    use approx::assert_relative_eq;

    fn map() -> DataMap {
        grid_map(2, 3, |row, column, cell| {
            if column > 0 {
                cell.mass = 1.0;
                cell.flow = Vector2::new(0.5, -0.25);
                cell.temperature = 300.0 + 10.0 * (row + column) as f64;
            }
        })
    }

    #[test]
    fn arrows_start_at_droplet_cells_and_scale_with_flow() {
        let map = map();
        let plot = FlowPlot::new(
            &map,
            FlowOptions {
                scale: 2.0,
                ..Default::default()
            },
        );
        let arrows = plot.arrows();
        assert_eq!(arrows.len(), 4);
        let first = arrows[0];
        assert_eq!(first.start, Point2::new(1.5, 0.5));
        assert_relative_eq!(first.end.x, 2.5);
        assert_relative_eq!(first.end.y, 0.0);
        assert_eq!(first.temperature, 310.0);
    }

    #[test]
    fn arrows_respect_minimum_mass() {
        let map = map();
        let options = FlowOptions {
            droplet: DropletConfig {
                min_mass: 2.0,
                columns: 1,
            },
            ..Default::default()
        };
        assert!(FlowPlot::new(&map, options).arrows().is_empty());
    }

    #[test]
    fn arrow_head_is_symmetric_around_shaft() {
        let arrow = Arrow {
            start: Point2::new(0.0, 0.0),
            end: Point2::new(1.0, 0.0),
            temperature: 0.0,
        };
        let [left, tip, right] = arrow.head();
        assert_eq!(tip, (1.0, 0.0));
        assert_relative_eq!(left.0, right.0);
        assert_relative_eq!(left.1, -right.1);
        assert!(left.0 < 1.0);
        assert_relative_eq!(
            ((left.0 - 1.0).powi(2) + left.1.powi(2)).sqrt(),
            HEAD_FRACTION
        );
    }

    #[test]
    fn temperature_bounds_default_to_drawn_cells() {
        let map = map();
        let plot = FlowPlot::new(&map, FlowOptions::default());
        let arrows = plot.arrows();
        let colormap = plot.colormap(&arrows, None, Some(400.0));
        assert_relative_eq!(colormap.normalise(310.0), 1.0);
        assert_relative_eq!(colormap.normalise(355.0), 0.5);
    }
}
