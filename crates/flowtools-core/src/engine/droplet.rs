//! Detection of the droplet cells of a map.
//!
//! A cell belongs to the droplet when it has flow, carries at least the
//! minimum mass and is connected to droplet cells of its neighbouring row.
//! The connection rule removes the thin precursor film which runs ahead of a
//! spreading droplet along the substrate.

use super::config::DropletConfig;
use crate::core::models::map::DataMap;
use nalgebra::{Point2, Vector2};
use ndarray::Array2;

/// Droplet membership of the cells of a map, indexed `[row, column]` like the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropletMask {
    mask: Array2<bool>,
}

impl DropletMask {
    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.mask.get([row, column]).copied().unwrap_or(false)
    }

    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&inside| inside).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The lowest row containing droplet cells.
    pub fn floor(&self) -> Option<usize> {
        self.mask
            .outer_iter()
            .position(|row| row.iter().any(|&inside| inside))
    }

    /// The leftmost and rightmost droplet columns of a row.
    pub fn edges(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.mask.nrows() {
            return None;
        }
        let cells = self.mask.row(row);
        let left = cells.iter().position(|&inside| inside)?;
        let right = cells.iter().rposition(|&inside| inside)?;
        Some((left, right))
    }
}

/// Whether the cell at `column` of `row` connects to a candidate cell of the
/// neighbouring row within `width` columns.
///
/// The neighbouring row is the one above, or the one below for the top row.
/// Walking along the neighbouring row from the connecting column to the
/// cell's column may not pass two consecutive non-candidate cells.
fn is_connected(candidates: &Array2<bool>, row: usize, column: usize, width: usize) -> bool {
    let (rows, columns) = candidates.dim();
    let neighbour = if row + 1 < rows {
        row + 1
    } else {
        row.saturating_sub(1)
    };
    let inside = |c: usize| candidates[[neighbour, c]];

    let first = column.saturating_sub(width);
    let last = column.saturating_add(width).min(columns - 1);

    (first..=last)
        .filter(|&check| check != column)
        .filter(|&check| inside(check))
        .any(|check| {
            let path: Vec<usize> = if check < column {
                (check..=column).collect()
            } else {
                (column..=check).rev().collect()
            };
            path.windows(2).all(|pair| inside(pair[0]) || inside(pair[1]))
        })
}

/// Finds the droplet cells of a map.
///
/// Flow and mass select candidate cells; connectivity is evaluated against
/// the candidates, so the result does not depend on the order cells are visited.
pub fn detect(map: &DataMap, config: &DropletConfig) -> DropletMask {
    let candidates = map
        .cells()
        .map(|cell| cell.has_flow() && cell.mass >= config.min_mass);

    let mask = Array2::from_shape_fn(candidates.dim(), |(row, column)| {
        candidates[[row, column]] && is_connected(&candidates, row, column, config.columns)
    });

    DropletMask { mask }
}

/// Mass-weighted mean position of the droplet cells.
///
/// Returns `None` if the droplet cells carry no mass.
pub fn center_of_mass(map: &DataMap, mask: &DropletMask) -> Option<Point2<f64>> {
    let (mass, moment) = map
        .cells()
        .indexed_iter()
        .filter(|((row, column), _)| mask.contains(*row, *column))
        .fold((0.0, Vector2::zeros()), |(mass, moment), (_, cell)| {
            (mass + cell.mass, moment + cell.position.coords * cell.mass)
        });

    (mass > 0.0).then(|| Point2::from(moment / mass))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::map::test_utils::grid_map;
    use approx::assert_relative_eq;

    fn map_from_rows(rows: &[&str]) -> DataMap {
        let height = rows.len();
        grid_map(height, rows[0].len(), |row, column, cell| {
            let symbol = rows[height - 1 - row].as_bytes()[column];
            if symbol != b'.' {
                cell.mass = (symbol - b'0') as f64;
                cell.flow = Vector2::new(0.1, 0.0);
            }
        })
    }

    fn mask_rows(mask: &DropletMask) -> Vec<String> {
        mask.mask()
            .outer_iter()
            .rev()
            .map(|row| row.iter().map(|&m| if m { '#' } else { '.' }).collect())
            .collect()
    }

    #[test]
    fn precursor_film_is_not_part_of_droplet() {
        let map = map_from_rows(&["..11..", "111111"]);
        let mask = detect(&map, &DropletConfig::default());
        assert_eq!(mask_rows(&mask), vec!["..##..", ".####."]);
    }

    #[test]
    fn wider_search_does_not_bridge_gaps_in_neighbour_row() {
        let map = map_from_rows(&["..11..", "111111"]);
        let config = DropletConfig {
            columns: 2,
            ..Default::default()
        };
        let mask = detect(&map, &config);
        assert_eq!(mask_rows(&mask), vec!["..##..", ".####."]);
    }

    #[test]
    fn search_width_beyond_the_grid_is_clamped() {
        let map = map_from_rows(&["..11..", "111111"]);
        let config = DropletConfig {
            columns: usize::MAX,
            ..Default::default()
        };
        let mask = detect(&map, &config);
        assert_eq!(mask_rows(&mask), vec!["..##..", ".####."]);
    }

    #[test]
    fn connection_may_skip_single_empty_cells() {
        let map = map_from_rows(&["1.1..", "11111"]);
        let config = DropletConfig {
            columns: 3,
            ..Default::default()
        };
        let mask = detect(&map, &config);
        assert_eq!(mask_rows(&mask), vec!["#.#..", "####."]);
    }

    #[test]
    fn cells_below_minimum_mass_or_without_flow_are_excluded() {
        let mut map = map_from_rows(&["1111", "1211"]);
        let mut cells = map.cells().clone();
        cells[[1, 3]].flow = Vector2::zeros();
        map = DataMap::from_grid(cells, map.fields()).unwrap();

        let config = DropletConfig {
            min_mass: 1.5,
            columns: 1,
        };
        assert!(detect(&map, &config).is_empty());

        let mask = detect(&map, &DropletConfig::default());
        assert!(!mask.contains(1, 3));
        assert_eq!(mask.count(), 7);
    }

    #[test]
    fn floor_and_edges_come_from_droplet_rows() {
        let map = map_from_rows(&["..1..", ".111.", "....."]);
        let mask = detect(&map, &DropletConfig::default());
        assert_eq!(mask_rows(&mask), vec!["..#..", ".#.#.", "....."]);
        assert_eq!(mask.floor(), Some(1));
        assert_eq!(mask.edges(1), Some((1, 3)));
        assert_eq!(mask.edges(0), None);
        assert_eq!(mask.edges(7), None);
    }

    #[test]
    fn center_of_mass_is_mass_weighted() {
        let map = map_from_rows(&["13", "13"]);
        let mask = detect(&map, &DropletConfig::default());
        let com = center_of_mass(&map, &mask).unwrap();
        assert_relative_eq!(com.x, 0.5 * 0.25 + 1.5 * 0.75);
        assert_relative_eq!(com.y, 1.0);
    }

    #[test]
    fn center_of_mass_of_empty_droplet_is_undefined() {
        let map = map_from_rows(&["..", ".."]);
        let mask = detect(&map, &DropletConfig::default());
        assert!(mask.is_empty());
        assert_eq!(mask.floor(), None);
        assert_eq!(center_of_mass(&map, &mask), None);
    }
}
