//! Conversion of legacy split maps into current maps.

use super::error::EngineError;
use crate::core::models::cell::Cell;
use crate::core::models::field::FieldSet;
use crate::core::models::map::{DataMap, coordinates_match};
use nalgebra::Vector2;
use ndarray::Zip;
use tracing::warn;

fn same_position(a: &Cell, b: &Cell) -> bool {
    coordinates_match(a.position.x, b.position.x) && coordinates_match(a.position.y, b.position.y)
}

/// Merges a density map with the sparse flow cells of the same frame.
///
/// Flow cells are matched to density cells in file order; density cells
/// without a matching flow cell get zero flow.
pub fn merge(density: &DataMap, flow: &[Cell]) -> Result<DataMap, EngineError> {
    let mut cells = density.cells().clone();
    let mut pending = flow.iter().peekable();

    for column in 0..density.columns() {
        for row in 0..density.rows() {
            let cell = &mut cells[[row, column]];
            match pending.next_if(|flow_cell| same_position(cell, flow_cell)) {
                Some(flow_cell) => cell.flow = flow_cell.flow,
                None => cell.flow = Vector2::zeros(),
            }
        }
    }

    let unmatched = pending.count();
    if unmatched > 0 {
        warn!(unmatched, "Flow cells without a matching density cell were ignored.");
    }

    Ok(DataMap::from_grid(
        cells,
        density.fields().union(FieldSet::FLOW),
    )?)
}

/// Converts a map accumulated since the start of a simulation into the map of
/// a single frame, by removing the contents of the previous cumulative map.
///
/// Temperature and flow are recovered from their weighted sums. Cells which
/// gained no atoms get zero temperature, cells which gained no mass zero flow.
pub fn decumulate(current: &DataMap, previous: &DataMap) -> Result<DataMap, EngineError> {
    if !current.info().same_shape(previous.info()) {
        return Err(EngineError::ShapeMismatch {
            index: 1,
            expected: current.info().to_string(),
            found: previous.info().to_string(),
        });
    }

    let cells = Zip::from(current.cells())
        .and(previous.cells())
        .map_collect(|cur, prev| {
            let num_atoms = cur.num_atoms - prev.num_atoms;
            let mass = cur.mass - prev.mass;
            let temperature = if num_atoms > 0.0 {
                (cur.temperature * cur.num_atoms - prev.temperature * prev.num_atoms) / num_atoms
            } else {
                0.0
            };
            let flow = if mass > 0.0 {
                (cur.mass_flux() - prev.mass_flux()) / mass
            } else {
                Vector2::zeros()
            };
            Cell {
                position: cur.position,
                mass,
                num_atoms,
                temperature,
                flow,
            }
        });

    Ok(DataMap::from_grid(
        cells,
        current.fields().intersection(previous.fields()),
    )?)
}
