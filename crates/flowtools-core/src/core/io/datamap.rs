use super::table::{MapFormatError, read_table, write_table};
use super::traits::DataFile;
use crate::core::models::field::FieldSet;
use crate::core::models::map::DataMap;
use std::io::{BufRead, Write};

/// The current data map format, with any of `X Y N T M U V` in one file.
///
/// Only the positions are required. Fields missing from the header are zero
/// and not marked as present in the map.
pub struct DataMapFile;

impl DataFile for DataMapFile {
    type Content = DataMap;
    type Error = MapFormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<DataMap, MapFormatError> {
        let table = read_table(reader, FieldSet::POSITION, FieldSet::ALL)?;
        Ok(DataMap::from_column_major(table.cells, table.fields)?)
    }

    /// Writes the fields present in the map.
    fn write_to(map: &DataMap, writer: &mut impl Write) -> Result<(), MapFormatError> {
        write_table(map.iter_column_major(), map.fields(), writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cell::Cell;
    use crate::core::models::field::Field;
    use crate::core::models::map::GridError;
    use nalgebra::{Point2, Vector2};
    use ndarray::Array2;
    use std::io::Cursor;
    use tempfile::tempdir;

    const MAP: &str = "\
X Y N T M U V
0.5 0.5 10 300.5 120.1 0.01 -0.02
0.5 1.5 0 0 0 0 0
1.5 0.5 12 299 144.25 0.1 0
1.5 1.5 1 250 12.011 0 0.3
";

    #[test]
    fn reads_cells_into_grid() {
        let map = DataMapFile::read_from(&mut Cursor::new(MAP)).unwrap();
        assert_eq!(map.rows(), 2);
        assert_eq!(map.columns(), 2);
        assert_eq!(map.fields(), FieldSet::ALL);

        let cell = map.cell(0, 1).unwrap();
        assert_eq!(cell.position, Point2::new(1.5, 0.5));
        assert_eq!(cell.num_atoms, 12.0);
        assert_eq!(cell.temperature, 299.0);
        assert_eq!(cell.mass, 144.25);
        assert_eq!(cell.flow, Vector2::new(0.1, 0.0));
        assert_eq!(map.cell(1, 1).unwrap().flow.y, 0.3);
    }

    #[test]
    fn header_order_is_free() {
        let shuffled = "\
V U M T N Y X
-0.02 0.01 120.1 300.5 10 0.5 0.5
0 0 0 0 0 1.5 0.5
0 0.1 144.25 299 12 0.5 1.5
0.3 0 12.011 250 1 1.5 1.5
";
        let a = DataMapFile::read_from(&mut Cursor::new(MAP)).unwrap();
        let b = DataMapFile::read_from(&mut Cursor::new(shuffled)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn partial_header_marks_only_present_fields() {
        let map = DataMapFile::read_from(&mut Cursor::new("x y m\n0 0 1.5\n0 1 2\n")).unwrap();
        assert_eq!(map.fields(), FieldSet::POSITION.union(FieldSet::from_iter([Field::M])));
        assert_eq!(map.cell(1, 0).unwrap().mass, 2.0);
        assert_eq!(map.cell(1, 0).unwrap().temperature, 0.0);

        let mut out = Vec::new();
        DataMapFile::write_to(&map, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "X Y M\n0 0 1.5\n0 1 2\n");
    }

    #[test]
    fn positions_are_required() {
        assert!(matches!(
            DataMapFile::read_from(&mut Cursor::new("X N T M\n0 1 1 1\n")),
            Err(MapFormatError::MissingField(Field::Y))
        ));
    }

    #[test]
    fn header_without_data_has_no_grid() {
        assert!(matches!(
            DataMapFile::read_from(&mut Cursor::new("X Y N T M U V\n")),
            Err(MapFormatError::Grid(GridError::Empty))
        ));
    }

    #[test]
    fn row_wider_than_header_is_rejected() {
        let content = "X Y N T M U V\n0 0 1 1 1 0 0 7\n";
        assert!(matches!(
            DataMapFile::read_from(&mut Cursor::new(content)),
            Err(MapFormatError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn written_map_reads_back_identical() {
        let grid = Array2::from_shape_fn((3, 4), |(row, column)| Cell {
            position: Point2::new(-1.25 + 0.25 * column as f64, 0.1 * row as f64),
            mass: 1.0 / (1.0 + row as f64 + column as f64),
            num_atoms: (row * 4 + column) as f64,
            temperature: 273.15 + column as f64 / 3.0,
            flow: Vector2::new(1e-7 * row as f64, -0.123456789 * column as f64),
        });
        let map = DataMap::from_grid(grid, FieldSet::ALL).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("map_00001.dat");
        DataMapFile::write_to_path(&map, &path).unwrap();
        let read = DataMapFile::read_from_path(&path).unwrap();

        assert_eq!(read, map);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            DataMapFile::read_from_path(dir.path().join("nope.dat")),
            Err(MapFormatError::Io(_))
        ));
    }
}
