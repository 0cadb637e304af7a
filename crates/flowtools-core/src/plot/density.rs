use super::colour::Colormap;
use super::error::{PlotError, drawing_error};
use super::figure::{FigureOptions, Render, cartesian, padded};
use crate::core::models::map::DataMap;
use crate::engine::config::DropletConfig;
use crate::engine::droplet::detect;
use plotters::coord::Shift;
use plotters::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DensityOptions {
    pub droplet: DropletConfig,
    /// Mass drawn at full colour. Defaults to the largest drawn mass.
    pub norm: Option<f64>,
}

/// A drawn cell: its corners and its mass relative to the normaliser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityCell {
    pub lower: (f64, f64),
    pub upper: (f64, f64),
    pub value: f64,
}

/// A map of droplet cells filled by mass.
pub struct DensityPlot<'a> {
    map: &'a DataMap,
    options: DensityOptions,
}

impl<'a> DensityPlot<'a> {
    pub fn new(map: &'a DataMap, options: DensityOptions) -> Self {
        Self { map, options }
    }

    pub fn cells(&self) -> Vec<DensityCell> {
        let mask = detect(self.map, &self.options.droplet);
        let size = self.map.info().cell_size / 2.0;
        let drawn: Vec<_> = self
            .map
            .cells()
            .indexed_iter()
            .filter(|((row, column), _)| mask.contains(*row, *column))
            .map(|(_, cell)| cell)
            .collect();

        let norm = self
            .options
            .norm
            .unwrap_or_else(|| drawn.iter().map(|c| c.mass).fold(0.0, f64::max));

        drawn
            .into_iter()
            .map(|cell| DensityCell {
                lower: (cell.position.x - size.x, cell.position.y - size.y),
                upper: (cell.position.x + size.x, cell.position.y + size.y),
                value: if norm > 0.0 { cell.mass / norm } else { 0.0 },
            })
            .collect()
    }
}

impl Render for DensityPlot<'_> {
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        options: &FigureOptions,
    ) -> Result<(), PlotError> {
        let cells = self.cells();
        if cells.is_empty() {
            return Err(PlotError::NoData("no droplet cells"));
        }

        let info = self.map.info();
        let half = info.cell_size / 2.0;
        let range = (
            padded(info.origin.x - half.x, info.end.x + half.x, 0.0),
            padded(info.origin.y - half.y, info.end.y + half.y, 0.0),
        );
        let mut chart = cartesian(area, options, range, ("x (nm)", "y (nm)"))?;

        let colormap = Colormap::density(0.0, 1.0);
        chart
            .draw_series(cells.iter().map(|cell| {
                Rectangle::new([cell.lower, cell.upper], colormap.colour(cell.value).filled())
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
                cell.mass = (1 + row + column) as f64;
                cell.flow = nalgebra::Vector2::new(0.0, -0.1);
            }
        })
    }

    #[test]
    fn cells_cover_droplet_and_are_normalised_to_largest_mass() {
        let map = map();
        let cells = DensityPlot::new(&map, DensityOptions::default()).cells();

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].lower, (1.0, 0.0));
        assert_eq!(cells[0].upper, (2.0, 1.0));
        assert_relative_eq!(cells[0].value, 0.5);
        let largest = cells.iter().map(|c| c.value).fold(0.0, f64::max);
        assert_relative_eq!(largest, 1.0);
    }

    #[test]
    fn given_normaliser_is_used() {
        let map = map();
        let options = DensityOptions {
            norm: Some(8.0),
            ..Default::default()
        };
        let cells = DensityPlot::new(&map, options).cells();
        assert_relative_eq!(cells[0].value, 0.25);
    }

    #[test]
    fn light_cells_are_left_out() {
        let map = map();
        let options = DensityOptions {
            droplet: DropletConfig {
                min_mass: 2.5,
                columns: 1,
            },
            norm: None,
        };
        let cells = DensityPlot::new(&map, options).cells();
        // The heaviest cell has no connected neighbour left in the row below.
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].lower, (2.0, 0.0));
        assert_eq!(cells[1].lower, (1.0, 1.0));
        assert!(cells.iter().all(|c| c.value == 1.0));
    }
}
