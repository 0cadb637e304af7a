use crate::core::models::cell::Cell;
use crate::core::models::field::{Field, FieldSet};
use crate::core::models::map::GridError;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapFormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing header line naming the data fields")]
    MissingHeader,
    #[error("Unknown field '{0}' in header")]
    UnknownField(String),
    #[error("Field '{0}' appears more than once in header")]
    DuplicateField(Field),
    #[error("Header lacks required field '{0}'")]
    MissingField(Field),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected {expected} values as declared by the header, found {found}")]
    RowWidth { expected: usize, found: usize },
    #[error("invalid number '{value}' in column {column} ({field})")]
    InvalidFloat {
        column: usize,
        field: Field,
        value: String,
    },
}

/// Cells read from a map file, in file order.
#[derive(Debug)]
pub(crate) struct Table {
    /// Fields that were both declared in the header and kept.
    pub fields: FieldSet,
    pub cells: Vec<Cell>,
}

fn parse_header(line: &str, required: FieldSet) -> Result<Vec<Field>, MapFormatError> {
    let mut columns = Vec::new();
    let mut seen = FieldSet::EMPTY;

    for token in line.split_whitespace() {
        let field = match Field::from_symbol(token) {
            Some(field) => field,
            None if token.parse::<f64>().is_ok() => return Err(MapFormatError::MissingHeader),
            None => return Err(MapFormatError::UnknownField(token.to_string())),
        };
        if seen.contains(field) {
            return Err(MapFormatError::DuplicateField(field));
        }
        seen.insert(field);
        columns.push(field);
    }

    if let Some(field) = seen.first_missing(required) {
        return Err(MapFormatError::MissingField(field));
    }
    Ok(columns)
}

/// Reads a header and the cells following it.
///
/// Every field of `required` must be declared. Declared fields outside of
/// `keep` are parsed but their values are dropped.
pub(crate) fn read_table(
    reader: &mut impl BufRead,
    required: FieldSet,
    keep: FieldSet,
) -> Result<Table, MapFormatError> {
    let mut header: Option<Vec<Field>> = None;
    let mut cells = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        if line.trim().is_empty() {
            continue;
        }

        let Some(columns) = header.as_ref() else {
            header = Some(parse_header(&line, required)?);
            continue;
        };

        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != columns.len() {
            return Err(MapFormatError::Parse {
                line: line_num,
                kind: ParseErrorKind::RowWidth {
                    expected: columns.len(),
                    found: values.len(),
                },
            });
        }

        let mut cell = Cell::default();
        for (column, (field, value)) in columns.iter().zip(values).enumerate() {
            let parsed: f64 = value.parse().map_err(|_| MapFormatError::Parse {
                line: line_num,
                kind: ParseErrorKind::InvalidFloat {
                    column: column + 1,
                    field: *field,
                    value: value.to_string(),
                },
            })?;
            if keep.contains(*field) {
                field.assign(&mut cell, parsed);
            }
        }
        cells.push(cell);
    }

    let columns = header.ok_or(MapFormatError::MissingHeader)?;
    let declared: FieldSet = columns.into_iter().collect();
    let fields = FieldSet::ALL
        .iter()
        .filter(|field| declared.contains(*field) && keep.contains(*field))
        .collect();

    Ok(Table { fields, cells })
}

/// Writes a header of `fields` in canonical order and one line per cell.
///
/// Values are written in their shortest round-trip form.
pub(crate) fn write_table<'a>(
    cells: impl Iterator<Item = &'a Cell>,
    fields: FieldSet,
    writer: &mut impl Write,
) -> io::Result<()> {
    let header: Vec<&str> = fields.iter().map(Field::symbol).collect();
    writeln!(writer, "{}", header.join(" "))?;

    for cell in cells {
        let line: Vec<String> = fields
            .iter()
            .map(|field| field.value(cell).to_string())
            .collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}
