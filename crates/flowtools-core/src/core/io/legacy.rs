//! The legacy map formats, where each frame was split into two files.
//!
//! A density map holds `X Y N T M` for every cell of the grid. A flow map holds
//! `X Y U V` for only those cells which had any flow, listed in the same order
//! as the cells of the density map.

use super::table::{MapFormatError, read_table, write_table};
use super::traits::DataFile;
use crate::core::models::cell::Cell;
use crate::core::models::field::FieldSet;
use crate::core::models::map::DataMap;
use std::io::{BufRead, Write};

pub struct DensityMapFile;

impl DataFile for DensityMapFile {
    type Content = DataMap;
    type Error = MapFormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<DataMap, MapFormatError> {
        let table = read_table(reader, FieldSet::DENSITY, FieldSet::DENSITY)?;
        Ok(DataMap::from_column_major(table.cells, table.fields)?)
    }

    fn write_to(map: &DataMap, writer: &mut impl Write) -> Result<(), MapFormatError> {
        write_table(map.iter_column_major(), FieldSet::DENSITY, writer)?;
        Ok(())
    }
}

pub struct FlowMapFile;

impl DataFile for FlowMapFile {
    /// The cells with flow, in file order. Only positions and flow are set.
    type Content = Vec<Cell>;
    type Error = MapFormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Cell>, MapFormatError> {
        Ok(read_table(reader, FieldSet::FLOW, FieldSet::FLOW)?.cells)
    }

    fn write_to(cells: &Vec<Cell>, writer: &mut impl Write) -> Result<(), MapFormatError> {
        write_table(cells.iter(), FieldSet::FLOW, writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::field::Field;
    use std::io::Cursor;

    #[test]
    fn density_map_reads_without_flow_fields() {
        let content = "X Y N T M\n0 0 2 300 24\n0 1 0 0 0\n";
        let map = DensityMapFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(map.fields(), FieldSet::DENSITY);
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cell(0, 0).unwrap().mass, 24.0);
    }

    #[test]
    fn density_map_ignores_flow_columns_of_current_maps() {
        let content = "X Y N T M U V\n0 0 2 300 24 1 1\n";
        let map = DensityMapFile::read_from(&mut Cursor::new(content)).unwrap();
        assert!(!map.fields().contains(Field::U));
        assert!(!map.cell(0, 0).unwrap().has_flow());
    }

    #[test]
    fn flow_map_may_be_sparse() {
        let content = "X Y U V\n0 1 0.5 -0.5\n3 2 0.1 0.2\n";
        let cells = FlowMapFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].position.x, 3.0);
        assert_eq!(cells[1].flow.y, 0.2);
    }

    #[test]
    fn flow_map_requires_velocity_columns() {
        assert!(matches!(
            FlowMapFile::read_from(&mut Cursor::new("X Y U\n")),
            Err(MapFormatError::MissingField(Field::V))
        ));
    }
}
