use super::cell::Cell;
use super::field::FieldSet;
use nalgebra::{Point2, Vector2};
use ndarray::{Array2, ShapeBuilder};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Map contains no cells")]
    Empty,
    #[error("{total} cells cannot be arranged into columns of {column_len} cells")]
    Ragged { total: usize, column_len: usize },
    #[error("Position along x changes inside column {column} (at row {row})")]
    Irregular { column: usize, row: usize },
}

/// Geometry of a regular grid of cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInfo {
    /// Number of cells along x.
    pub columns: usize,
    /// Number of cells along y.
    pub rows: usize,
    /// Cell size along x and y.
    pub cell_size: Vector2<f64>,
    /// Centre of the first (bottom left) cell.
    pub origin: Point2<f64>,
    /// Centre of the last (top right) cell.
    pub end: Point2<f64>,
}

impl GridInfo {
    pub fn total_cells(&self) -> usize {
        self.columns * self.rows
    }

    /// Whether two grids have the same dimensions, cell size and origin.
    pub fn same_shape(&self, other: &GridInfo) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && coordinates_match(self.cell_size.x, other.cell_size.x)
            && coordinates_match(self.cell_size.y, other.cell_size.y)
            && coordinates_match(self.origin.x, other.origin.x)
            && coordinates_match(self.origin.y, other.origin.y)
    }
}

impl fmt::Display for GridInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} cells of size {}x{} starting at ({}, {})",
            self.columns,
            self.rows,
            self.cell_size.x,
            self.cell_size.y,
            self.origin.x,
            self.origin.y
        )
    }
}

pub(crate) fn coordinates_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

/// A data map: one time instant's grid of cells.
///
/// Cells are indexed `[row, column]`, rows running along y from the bottom of
/// the system and columns along x from the left. A map is never modified
/// after construction; operations on maps return new maps.
#[derive(Debug, Clone, PartialEq)]
pub struct DataMap {
    cells: Array2<Cell>,
    fields: FieldSet,
    info: GridInfo,
}

impl DataMap {
    /// Builds a map from cells listed column by column.
    ///
    /// This is the order of map files: all cells of the first column with
    /// increasing y, then all cells of the next column. The number of rows is
    /// taken as the number of leading cells sharing the first x position.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if there are no cells or they do not form a
    /// regular grid.
    pub fn from_column_major(cells: Vec<Cell>, fields: FieldSet) -> Result<Self, GridError> {
        let first = cells.first().ok_or(GridError::Empty)?;
        let rows = cells
            .iter()
            .take_while(|cell| coordinates_match(cell.position.x, first.position.x))
            .count();

        let total = cells.len();
        if total % rows != 0 {
            return Err(GridError::Ragged {
                total,
                column_len: rows,
            });
        }

        for (column, chunk) in cells.chunks(rows).enumerate() {
            let x = chunk[0].position.x;
            if let Some(row) = chunk
                .iter()
                .position(|cell| !coordinates_match(cell.position.x, x))
            {
                return Err(GridError::Irregular { column, row });
            }
        }

        let columns = total / rows;
        let grid = Array2::from_shape_vec((rows, columns).f(), cells).map_err(|_| {
            GridError::Ragged {
                total,
                column_len: rows,
            }
        })?;

        Self::from_grid(grid, fields)
    }

    /// Builds a map from an already arranged grid of cells.
    pub fn from_grid(cells: Array2<Cell>, fields: FieldSet) -> Result<Self, GridError> {
        let (rows, columns) = cells.dim();
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }

        let origin = cells[[0, 0]].position;
        let end = cells[[rows - 1, columns - 1]].position;

        let dx = (columns > 1).then(|| cells[[0, 1]].position.x - origin.x);
        let dy = (rows > 1).then(|| cells[[1, 0]].position.y - origin.y);
        let cell_size = match (dx, dy) {
            (Some(dx), Some(dy)) => Vector2::new(dx, dy),
            (Some(dx), None) => Vector2::new(dx, dx),
            (None, Some(dy)) => Vector2::new(dy, dy),
            (None, None) => Vector2::zeros(),
        };

        Ok(Self {
            cells,
            fields,
            info: GridInfo {
                columns,
                rows,
                cell_size,
                origin,
                end,
            },
        })
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// The fields which were read from file or computed for this map.
    pub fn fields(&self) -> FieldSet {
        self.fields
    }

    pub fn info(&self) -> &GridInfo {
        &self.info
    }

    pub fn rows(&self) -> usize {
        self.info.rows
    }

    pub fn columns(&self) -> usize {
        self.info.columns
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells.get([row, column])
    }

    /// The x position of a column.
    pub fn x(&self, column: usize) -> Option<f64> {
        self.cell(0, column).map(|cell| cell.position.x)
    }

    /// The y position of a row.
    pub fn y(&self, row: usize) -> Option<f64> {
        self.cell(row, 0).map(|cell| cell.position.y)
    }

    /// Iterates over cells in file order, column by column.
    pub fn iter_column_major(&self) -> impl Iterator<Item = &Cell> {
        self.cells.t().into_iter()
    }

    pub fn total_mass(&self) -> f64 {
        self.cells.iter().map(|cell| cell.mass).sum()
    }

    pub fn total_atoms(&self) -> f64 {
        self.cells.iter().map(|cell| cell.num_atoms).sum()
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    /// A `columns` x `rows` map of unit cells centred at half-integer positions,
    /// with every cell filled by `fill(row, column)`.
    pub fn grid_map(
        rows: usize,
        columns: usize,
        fill: impl Fn(usize, usize, &mut Cell),
    ) -> DataMap {
        let grid = Array2::from_shape_fn((rows, columns), |(row, column)| {
            let mut cell = Cell::new(Point2::new(column as f64 + 0.5, row as f64 + 0.5));
            fill(row, column, &mut cell);
            cell
        });
        DataMap::from_grid(grid, FieldSet::ALL).unwrap()
    }
}
