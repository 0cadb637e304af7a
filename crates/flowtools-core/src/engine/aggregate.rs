use super::error::EngineError;
use crate::core::models::cell::Cell;
use crate::core::models::field::FieldSet;
use crate::core::models::map::DataMap;
use nalgebra::{Point2, Vector2};
use ndarray::{Array2, Axis, Zip};
use tracing::debug;

/// How mass and atom counts of several maps are combined.
///
/// Positions, temperature and flow are always the plain mean over the maps,
/// independent of the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Average mass and atom count, e.g. over frames in time.
    #[default]
    Mean,
    /// Sum mass and atom count, e.g. over cells merged into one.
    Sum,
}

/// Running sums of one quantity.
///
/// Values are accumulated as offsets from the first value, so that combining
/// identical values reproduces them exactly.
#[derive(Debug, Default)]
struct Accumulator {
    reference: Option<f64>,
    offsets: f64,
    weighted_offsets: f64,
    weights: f64,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64, weight: f64) {
        let reference = *self.reference.get_or_insert(value);
        let offset = value - reference;
        self.offsets += offset;
        self.weighted_offsets += weight * offset;
        self.weights += weight;
        self.sum += value;
        self.count += 1;
    }

    fn sum(&self) -> f64 {
        self.sum
    }

    fn mean(&self) -> f64 {
        match self.reference {
            Some(reference) => reference + self.offsets / self.count as f64,
            None => 0.0,
        }
    }

    /// Falls back to the plain mean when the weights sum to zero.
    fn weighted_mean(&self) -> f64 {
        match self.reference {
            Some(reference) if self.weights > 0.0 => {
                reference + self.weighted_offsets / self.weights
            }
            _ => self.mean(),
        }
    }
}

#[derive(Debug, Default)]
struct CellAccumulator {
    x: Accumulator,
    y: Accumulator,
    mass: Accumulator,
    num_atoms: Accumulator,
    temperature: Accumulator,
    flow_x: Accumulator,
    flow_y: Accumulator,
}

impl CellAccumulator {
    fn add(&mut self, cell: &Cell) {
        self.x.add(cell.position.x, 0.0);
        self.y.add(cell.position.y, 0.0);
        self.mass.add(cell.mass, 0.0);
        self.num_atoms.add(cell.num_atoms, 0.0);
        self.temperature.add(cell.temperature, cell.num_atoms);
        self.flow_x.add(cell.flow.x, cell.mass);
        self.flow_y.add(cell.flow.y, cell.mass);
    }

    /// The cell combining the same position of several maps.
    fn finish(&self, mode: Aggregation) -> Cell {
        let (mass, num_atoms) = match mode {
            Aggregation::Mean => (self.mass.mean(), self.num_atoms.mean()),
            Aggregation::Sum => (self.mass.sum(), self.num_atoms.sum()),
        };
        Cell {
            position: Point2::new(self.x.mean(), self.y.mean()),
            mass,
            num_atoms,
            temperature: self.temperature.mean(),
            flow: Vector2::new(self.flow_x.mean(), self.flow_y.mean()),
        }
    }

    /// The cell replacing a block of neighbouring cells of one map. Temperature
    /// is weighted by atoms and flow by mass.
    fn finish_block(&self) -> Cell {
        Cell {
            position: Point2::new(self.x.mean(), self.y.mean()),
            mass: self.mass.sum(),
            num_atoms: self.num_atoms.sum(),
            temperature: self.temperature.weighted_mean(),
            flow: Vector2::new(self.flow_x.weighted_mean(), self.flow_y.weighted_mean()),
        }
    }
}

/// Combines maps of identical shape cell by cell into a new map.
///
/// The result only declares the fields present in every input map.
///
/// # Errors
///
/// Returns [`EngineError::EmptyInput`] for no maps and
/// [`EngineError::ShapeMismatch`] if any map's grid differs from the first.
pub fn aggregate(maps: &[DataMap], mode: Aggregation) -> Result<DataMap, EngineError> {
    let first = maps.first().ok_or(EngineError::EmptyInput("maps"))?;
    for (index, map) in maps.iter().enumerate().skip(1) {
        if !first.info().same_shape(map.info()) {
            return Err(EngineError::ShapeMismatch {
                index,
                expected: first.info().to_string(),
                found: map.info().to_string(),
            });
        }
    }

    let mut accumulators =
        Array2::from_shape_fn(first.cells().dim(), |_| CellAccumulator::default());
    for map in maps {
        Zip::from(&mut accumulators)
            .and(map.cells())
            .for_each(|acc, cell| acc.add(cell));
    }

    let fields = maps
        .iter()
        .fold(FieldSet::ALL, |fields, map| fields.intersection(map.fields()));
    let cells = accumulators.map(|acc| acc.finish(mode));
    debug!(maps = maps.len(), ?mode, "Aggregated maps.");

    Ok(DataMap::from_grid(cells, fields)?)
}

/// Merges blocks of `nx` by `ny` cells into single cells.
///
/// Mass and atoms of a block are summed, positions averaged, temperature
/// weighted by atoms and flow by mass. Cells on the
/// right and top which do not fill a whole block are dropped.
pub fn coarsen(map: &DataMap, nx: usize, ny: usize) -> Result<DataMap, EngineError> {
    for (axis, factor, cells) in [('x', nx, map.columns()), ('y', ny, map.rows())] {
        if factor == 0 || factor > cells {
            return Err(EngineError::InvalidFactor {
                axis,
                factor,
                cells,
            });
        }
    }

    let shape = (map.rows() / ny, map.columns() / nx);
    let grid = Array2::from_shape_fn(shape, |(row, column)| {
        let block = map.cells().slice(ndarray::s![
            row * ny..(row + 1) * ny,
            column * nx..(column + 1) * nx
        ]);
        let mut acc = CellAccumulator::default();
        block.iter().for_each(|cell| acc.add(cell));
        acc.finish_block()
    });

    let dropped = map.info().total_cells() - grid.len() * nx * ny;
    if dropped > 0 {
        debug!(dropped, "Dropped cells outside of complete blocks.");
    }
    Ok(DataMap::from_grid(grid, map.fields())?)
}

/// An axis-aligned region of a map. Unset limits are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl Region {
    fn contains_x(&self, x: f64) -> bool {
        self.x_min.is_none_or(|min| x >= min) && self.x_max.is_none_or(|max| x <= max)
    }

    fn contains_y(&self, y: f64) -> bool {
        self.y_min.is_none_or(|min| y >= min) && self.y_max.is_none_or(|max| y <= max)
    }
}

/// Keeps the cells whose centres lie inside `region`, limits included.
pub fn cut(map: &DataMap, region: &Region) -> Result<DataMap, EngineError> {
    let columns: Vec<usize> = (0..map.columns())
        .filter(|&c| map.x(c).is_some_and(|x| region.contains_x(x)))
        .collect();
    let rows: Vec<usize> = (0..map.rows())
        .filter(|&r| map.y(r).is_some_and(|y| region.contains_y(y)))
        .collect();
    if columns.is_empty() || rows.is_empty() {
        return Err(EngineError::EmptyCut);
    }

    let grid = map
        .cells()
        .select(Axis(0), &rows)
        .select(Axis(1), &columns);
    Ok(DataMap::from_grid(grid, map.fields())?)
}
