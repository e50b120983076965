//! Table transformations applied before indexing.
//!
//! - copying a key column into the `id` field
//! - dropping an excluded column
//! - normalizing a date column to an ISO-8601 UTC timestamp
//! - inferring column types and converting rows to records

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::errors::IngestError;
use crate::reader::Table;
use solr_loader_shared::{FieldValue, Record};

/// Unique key field of a collection.
pub const ID_FIELD: &str = "id";

/// Output format of normalized date cells.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Type shared by every non-empty cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

/// Remove a column from the table.
///
/// # Returns
///
/// * `Ok(())` - The column was removed from the headers and every row
/// * `Err(IngestError::MissingColumn)` - If no column has that name
pub fn drop_column(table: &mut Table, name: &str) -> Result<(), IngestError> {
    let index = table
        .column_index(name)
        .ok_or_else(|| IngestError::missing_column(name))?;

    table.headers.remove(index);
    for row in &mut table.rows {
        if index < row.len() {
            row.remove(index);
        }
    }

    debug!(column = %name, "Column dropped");
    Ok(())
}

/// Copy `column` into the `id` field so documents can be addressed by it.
///
/// An existing `id` column is overwritten. Copying `id` onto itself is a no-op.
///
/// # Returns
///
/// * `Ok(())` - Every row carries the key in `id`
/// * `Err(IngestError::MissingColumn)` - If `column` is not in the table
pub fn copy_id_column(table: &mut Table, column: &str) -> Result<(), IngestError> {
    let source = table
        .column_index(column)
        .ok_or_else(|| IngestError::missing_column(column))?;
    if column == ID_FIELD {
        return Ok(());
    }

    match table.column_index(ID_FIELD) {
        Some(target) => {
            for row in &mut table.rows {
                let value = row.get(source).cloned().flatten();
                if let Some(cell) = row.get_mut(target) {
                    *cell = value;
                }
            }
        }
        None => {
            table.headers.push(ID_FIELD.to_string());
            for row in &mut table.rows {
                let value = row.get(source).cloned().flatten();
                row.push(value);
            }
        }
    }

    debug!(column = %column, "Key column copied to id");
    Ok(())
}

/// Parse a single date cell with `input_format` and render it as a UTC timestamp.
///
/// Formats with a time component are tried first; date-only formats get
/// midnight. Returns `None` when the value does not match the format.
pub fn normalize_date(value: &str, input_format: &str) -> Option<String> {
    let value = value.trim();

    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, input_format) {
        return Some(datetime.format(TIMESTAMP_FORMAT).to_string());
    }

    NaiveDate::parse_from_str(value, input_format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.format(TIMESTAMP_FORMAT).to_string())
}

/// Rewrite every cell of `column` as a UTC timestamp.
///
/// Cells that cannot be parsed become empty rather than failing the load.
/// A table without the column is left unchanged.
///
/// # Returns
///
/// The number of non-empty cells that could not be parsed.
pub fn normalize_date_column(table: &mut Table, column: &str, input_format: &str) -> usize {
    let Some(index) = table.column_index(column) else {
        return 0;
    };

    let mut unparseable = 0;
    for row in &mut table.rows {
        if let Some(cell) = row.get_mut(index) {
            if let Some(raw) = cell.take() {
                *cell = normalize_date(&raw, input_format);
                if cell.is_none() {
                    unparseable += 1;
                }
            }
        }
    }

    if unparseable > 0 {
        warn!(column = %column, count = unparseable, "Unparseable dates set to null");
    }
    unparseable
}

/// Determine the type of each column from its non-empty cells.
///
/// A column is `Integer` if every value parses as an integer, `Float` if every
/// value parses as a finite float, and `Text` otherwise. Columns with no values
/// are `Text`.
pub fn infer_column_types(table: &Table) -> Vec<ColumnType> {
    (0..table.headers.len())
        .map(|index| {
            let mut values = table
                .rows
                .iter()
                .filter_map(|row| row.get(index).and_then(|c| c.as_deref()))
                .map(str::trim)
                .peekable();

            if values.peek().is_none() {
                return ColumnType::Text;
            }

            let mut column_type = ColumnType::Integer;
            for value in values {
                if column_type == ColumnType::Integer && value.parse::<i64>().is_err() {
                    column_type = ColumnType::Float;
                }
                if column_type == ColumnType::Float && !is_finite_float(value) {
                    return ColumnType::Text;
                }
            }
            column_type
        })
        .collect()
}

fn is_finite_float(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

fn to_field_value(cell: Option<&str>, column_type: ColumnType) -> FieldValue {
    let Some(raw) = cell else {
        return FieldValue::Null;
    };

    match column_type {
        ColumnType::Integer => raw
            .trim()
            .parse()
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Null),
        ColumnType::Float => raw
            .trim()
            .parse()
            .map(FieldValue::Float)
            .unwrap_or(FieldValue::Null),
        ColumnType::Text => FieldValue::text(raw),
    }
}

/// Convert the table into one record per row, typed per column.
pub fn into_records(table: &Table) -> Vec<Record> {
    let types = infer_column_types(table);

    table
        .rows
        .iter()
        .map(|row| {
            let mut record = Record::new();
            for (index, header) in table.headers.iter().enumerate() {
                let cell = row.get(index).and_then(|c| c.as_deref());
                record.set(header.clone(), to_field_value(cell, types[index]));
            }
            record
        })
        .collect()
}
