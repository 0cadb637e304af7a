//! Spread files: collected droplet spreading with its collection metadata.
//!
//! ```text
//! Path: run1/flow_
//! Delta_t: 0.5
//! Floor: 3
//! Min mass: 1
//!
//! Spread:
//!      left     right       com     times      dist
//!    -1.250     1.250     5.000     4.000     2.100
//! ```
//!
//! Combined series add the columns `left_error right_error com_error
//! dist_error`. Columns are matched by name when reading.

use super::traits::DataFile;
use crate::core::models::spread::{SpreadErrors, SpreadMetadata, SpreadRecord, SpreadSeries};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpreadFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing 'Spread:' section")]
    MissingSection,
    #[error("Missing column header after 'Spread:'")]
    MissingHeader,
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("Invalid value for '{key}' on line {line}: '{value}'")]
    InvalidMetadata {
        line: usize,
        key: &'static str,
        value: String,
    },
    #[error("Line {line} has {found} values but the header names {expected} columns")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid number '{value}' on line {line}")]
    InvalidValue { line: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Left,
    Right,
    Com,
    Times,
    Dist,
    LeftError,
    RightError,
    ComError,
    DistError,
}

impl Column {
    const RECORD: [Column; 5] = [
        Column::Left,
        Column::Right,
        Column::Com,
        Column::Times,
        Column::Dist,
    ];
    const ERRORS: [Column; 4] = [
        Column::LeftError,
        Column::RightError,
        Column::ComError,
        Column::DistError,
    ];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Column::Left),
            "right" => Some(Column::Right),
            "com" => Some(Column::Com),
            "times" => Some(Column::Times),
            "dist" => Some(Column::Dist),
            "left_error" => Some(Column::LeftError),
            "right_error" => Some(Column::RightError),
            "com_error" => Some(Column::ComError),
            "dist_error" => Some(Column::DistError),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Column::Left => "left",
            Column::Right => "right",
            Column::Com => "com",
            Column::Times => "times",
            Column::Dist => "dist",
            Column::LeftError => "left_error",
            Column::RightError => "right_error",
            Column::ComError => "com_error",
            Column::DistError => "dist_error",
        }
    }

    fn is_error(self) -> bool {
        Self::ERRORS.contains(&self)
    }

    fn value(self, record: &SpreadRecord) -> f64 {
        let error = record.error.unwrap_or_default();
        match self {
            Column::Left => record.left,
            Column::Right => record.right,
            Column::Com => record.com,
            Column::Times => record.time,
            Column::Dist => record.dist,
            Column::LeftError => error.left,
            Column::RightError => error.right,
            Column::ComError => error.com,
            Column::DistError => error.dist,
        }
    }

    fn assign(self, record: &mut SpreadRecord, value: f64) {
        let error = record.error.get_or_insert_with(SpreadErrors::default);
        match self {
            Column::Left => record.left = value,
            Column::Right => record.right = value,
            Column::Com => record.com = value,
            Column::Times => record.time = value,
            Column::Dist => record.dist = value,
            Column::LeftError => error.left = value,
            Column::RightError => error.right = value,
            Column::ComError => error.com = value,
            Column::DistError => error.dist = value,
        }
    }
}

const REQUIRED: [Column; 3] = [Column::Left, Column::Right, Column::Times];

fn parse_metadata<T: std::str::FromStr>(
    value: &str,
    line: usize,
    key: &'static str,
) -> Result<T, SpreadFileError> {
    value.parse().map_err(|_| SpreadFileError::InvalidMetadata {
        line,
        key,
        value: value.to_string(),
    })
}

fn parse_header(line: &str) -> Result<Vec<Column>, SpreadFileError> {
    let columns = line
        .split_whitespace()
        .map(|name| {
            Column::from_name(&name.to_ascii_lowercase())
                .ok_or_else(|| SpreadFileError::UnknownColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(missing) = REQUIRED.iter().find(|c| !columns.contains(c)) {
        return Err(SpreadFileError::MissingColumn(missing.name()));
    }
    Ok(columns)
}

pub struct SpreadFile;

impl DataFile for SpreadFile {
    type Content = SpreadSeries;
    type Error = SpreadFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<SpreadSeries, SpreadFileError> {
        let mut metadata = SpreadMetadata::default();
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

        let mut found_section = false;
        for (line_num, line_res) in lines.by_ref() {
            let line = line_res?;
            let line = line.trim();
            if line.to_ascii_lowercase().starts_with("spread:") {
                found_section = true;
                break;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "path" => metadata.base = Some(value.to_string()),
                "delta_t" => metadata.delta_t = Some(parse_metadata(value, line_num, "Delta_t")?),
                "floor" => metadata.floor = Some(parse_metadata(value, line_num, "Floor")?),
                "min mass" => {
                    metadata.min_mass = Some(parse_metadata(value, line_num, "Min mass")?)
                }
                _ => {}
            }
        }
        if !found_section {
            return Err(SpreadFileError::MissingSection);
        }

        let mut columns = None;
        let mut series = SpreadSeries::new(metadata);

        for (line_num, line_res) in lines {
            let line = line_res?;
            if line.trim().is_empty() {
                if columns.is_some() {
                    break;
                }
                continue;
            }

            let Some(columns) = columns.as_ref() else {
                columns = Some(parse_header(&line)?);
                continue;
            };

            let values: Vec<&str> = line.split_whitespace().collect();
            if values.len() != columns.len() {
                return Err(SpreadFileError::RowWidth {
                    line: line_num,
                    expected: columns.len(),
                    found: values.len(),
                });
            }

            let mut record = SpreadRecord::new(0.0, 0.0, 0.0, 0.0, 0.0);
            for (column, value) in columns.iter().zip(values) {
                let parsed = value.parse().map_err(|_| SpreadFileError::InvalidValue {
                    line: line_num,
                    value: value.to_string(),
                })?;
                column.assign(&mut record, parsed);
            }
            if !columns.iter().any(|c| c.is_error()) {
                record.error = None;
            }
            series.push(record);
        }

        if columns.is_none() {
            return Err(SpreadFileError::MissingHeader);
        }
        Ok(series)
    }

    fn write_to(series: &SpreadSeries, writer: &mut impl Write) -> Result<(), SpreadFileError> {
        let metadata = &series.metadata;
        if let Some(base) = &metadata.base {
            writeln!(writer, "Path: {base}")?;
        }
        if let Some(delta_t) = metadata.delta_t {
            writeln!(writer, "Delta_t: {delta_t}")?;
        }
        if let Some(floor) = metadata.floor {
            writeln!(writer, "Floor: {floor}")?;
        }
        if let Some(min_mass) = metadata.min_mass {
            writeln!(writer, "Min mass: {min_mass}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "Spread:")?;

        let mut columns = Column::RECORD.to_vec();
        if series.has_errors() {
            columns.extend(Column::ERRORS);
        }

        let header: Vec<String> = columns.iter().map(|c| format!("{:>9}", c.name())).collect();
        writeln!(writer, "{}", header.join(" "))?;
        for record in series.records() {
            let line: Vec<String> = columns
                .iter()
                .map(|c| format!("{:9.3}", c.value(record)))
                .collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CsvRow {
    times: f64,
    left: f64,
    right: f64,
    radius: f64,
    com: f64,
    dist: f64,
}

#[derive(Serialize)]
struct CsvErrorRow {
    times: f64,
    left: f64,
    right: f64,
    radius: f64,
    com: f64,
    dist: f64,
    left_error: f64,
    right_error: f64,
    radius_error: f64,
    com_error: f64,
    dist_error: f64,
}

impl From<&SpreadRecord> for CsvRow {
    fn from(record: &SpreadRecord) -> Self {
        Self {
            times: record.time,
            left: record.left,
            right: record.right,
            radius: record.radius(),
            com: record.com,
            dist: record.dist,
        }
    }
}

impl From<&SpreadRecord> for CsvErrorRow {
    fn from(record: &SpreadRecord) -> Self {
        let error = record.error.unwrap_or_default();
        Self {
            times: record.time,
            left: record.left,
            right: record.right,
            radius: record.radius(),
            com: record.com,
            dist: record.dist,
            left_error: error.left,
            right_error: error.right,
            radius_error: record.radius_error().unwrap_or_default(),
            com_error: error.com,
            dist_error: error.dist,
        }
    }
}

/// Writes the records of a series as CSV at full precision, with a header row.
///
/// Error columns are included when every record carries errors.
pub fn write_csv(series: &SpreadSeries, writer: impl Write) -> Result<(), SpreadFileError> {
    let with_errors = series.has_errors();
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in series.records() {
        if with_errors {
            csv_writer.serialize(CsvErrorRow::from(record))?;
        } else {
            csv_writer.serialize(CsvRow::from(record))?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_to_path<P: AsRef<Path>>(
    series: &SpreadSeries,
    path: P,
) -> Result<(), SpreadFileError> {
    let file = File::create(path)?;
    write_csv(series, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn series() -> SpreadSeries {
        SpreadSeries::from_records(
            SpreadMetadata {
                base: Some("run/flow_".to_string()),
                delta_t: Some(0.5),
                floor: Some(3),
                min_mass: Some(1.0),
            },
            vec![
                SpreadRecord::new(4.0, -1.25, 1.25, 5.0, 2.1),
                SpreadRecord::new(4.5, -2.0, 1.5, 4.75, 1.8),
            ],
        )
    }

    fn written(series: &SpreadSeries) -> String {
        let mut out = Vec::new();
        SpreadFile::write_to(series, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn written_file_has_metadata_and_fixed_width_rows() {
        let text = written(&series());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Path: run/flow_");
        assert_eq!(lines[1], "Delta_t: 0.5");
        assert_eq!(lines[2], "Floor: 3");
        assert_eq!(lines[3], "Min mass: 1");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Spread:");
        assert_eq!(lines[6], "     left     right       com     times      dist");
        assert_eq!(lines[7], "   -1.250     1.250     5.000     4.000     2.100");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn file_round_trips_at_written_precision() {
        let original = series();
        let read = SpreadFile::read_from(&mut Cursor::new(written(&original))).unwrap();
        assert_eq!(read, original);
    }

    #[test]
    fn combined_series_round_trips_errors() {
        let records = series()
            .records()
            .iter()
            .map(|r| SpreadRecord {
                error: Some(SpreadErrors {
                    left: 0.125,
                    right: 0.25,
                    com: 0.5,
                    dist: 0.0,
                }),
                ..*r
            })
            .collect();
        let original = SpreadSeries::from_records(SpreadMetadata::default(), records);
        let text = written(&original);
        assert!(text.contains("left_error"));

        let read = SpreadFile::read_from(&mut Cursor::new(text)).unwrap();
        assert!(read.has_errors());
        assert_eq!(read, original);
    }

    #[test]
    fn columns_are_matched_by_name() {
        let content = "Floor: 2\nSpread:\ntimes right left\n1.0 3.0 -3.0\n\ntrailing text\n";
        let read = SpreadFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(read.metadata.floor, Some(2));
        assert_eq!(read.len(), 1);
        let record = read.records()[0];
        assert_eq!((record.time, record.left, record.right), (1.0, -3.0, 3.0));
        assert_eq!(record.com, 0.0);
        assert_eq!(record.error, None);
    }

    #[test]
    fn malformed_files_are_rejected() {
        let read = |s: &str| SpreadFile::read_from(&mut Cursor::new(s.to_string()));
        assert!(matches!(
            read("Floor: 2\n"),
            Err(SpreadFileError::MissingSection)
        ));
        assert!(matches!(
            read("Spread:\n"),
            Err(SpreadFileError::MissingHeader)
        ));
        assert!(matches!(
            read("Spread:\nleft right\n"),
            Err(SpreadFileError::MissingColumn("times"))
        ));
        assert!(matches!(
            read("Spread:\nleft right times width\n"),
            Err(SpreadFileError::UnknownColumn(name)) if name == "width"
        ));
        assert!(matches!(
            read("Floor: low\nSpread:\n"),
            Err(SpreadFileError::InvalidMetadata { line: 1, key: "Floor", .. })
        ));
        assert!(matches!(
            read("Spread:\nleft right times\n1 2\n"),
            Err(SpreadFileError::RowWidth { line: 3, expected: 3, found: 2 })
        ));
        assert!(matches!(
            read("Spread:\nleft right times\n1 2 x\n"),
            Err(SpreadFileError::InvalidValue { line: 3, .. })
        ));
    }

    #[test]
    fn csv_export_includes_radius_at_full_precision() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spread.csv");
        write_csv_to_path(&series(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("times,left,right,radius,com,dist"));
        assert_eq!(lines.next(), Some("4.0,-1.25,1.25,1.25,5.0,2.1"));
        assert_eq!(lines.next(), Some("4.5,-2.0,1.5,1.75,4.75,1.8"));
    }
}
