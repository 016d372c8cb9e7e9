// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Comma-separated export and import of a single collection.
//!
//! Export quotes string cells that contain a comma or a double quote. Import
//! splits lines naively on commas and strips the surrounding quotes of every
//! cell, so cells containing commas do not survive a round trip. Spreadsheet
//! scripts consuming these files rely on that exact shape. Typed records are
//! exported with list columns flattened (see [`crate::models::lenient`]) so
//! they import back cleanly.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::logic::error::CodecError;
use crate::models::lenient::flat_text;
use crate::models::records::{Record, creation_timestamp, new_record_id};

/// One flat record with columns in insertion order.
pub type Row = Map<String, Value>;

/// Render records as CSV text.
///
/// The header comes from the first record's keys; every row is read against
/// that header, so keys the first record lacks are never exported.
///
/// # Errors
///
/// Returns [`CodecError::EmptyInput`] when `records` is empty.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use travelcrm::logic::tabular::to_table;
///
/// let row = json!({"nome": "Ana, Maria", "cidade": "Recife"});
/// let csv = to_table(&[row.as_object().unwrap().clone()]).unwrap();
/// assert_eq!(csv, "nome,cidade\n\"Ana, Maria\",Recife");
/// ```
pub fn to_table(records: &[Row]) -> Result<String, CodecError> {
    let first = records.first().ok_or(CodecError::EmptyInput)?;
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| render_cell(record.get(h.as_str())))
            .collect();
        lines.push(cells.join(","));
    }

    debug!(rows = records.len(), columns = headers.len(), "rendered table");
    Ok(lines.join("\n"))
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => quote_if_needed(s),
        Some(Value::Number(n)) => render_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(nested) => quote_if_needed(&nested.to_string()),
    }
}

/// Whole floats render without a fractional part, as spreadsheets expect.
fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

fn quote_if_needed(text: &str) -> String {
    if text.contains(',') || text.contains('"') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Parse CSV text into rows of string cells.
///
/// Blank lines are skipped. Cells are trimmed and stripped of one surrounding
/// double quote on each side; a cell quoted on both sides also has its doubled
/// inner quotes collapsed. Missing trailing cells become empty strings and
/// surplus cells are dropped.
///
/// # Errors
///
/// Returns [`CodecError::MalformedTable`] unless a header and at least one data
/// line are present.
pub fn from_table(text: &str) -> Result<Vec<Row>, CodecError> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let [header, data @ ..] = lines.as_slice() else {
        return Err(CodecError::MalformedTable);
    };
    if data.is_empty() {
        return Err(CodecError::MalformedTable);
    }

    let headers: Vec<String> = header.split(',').map(clean_cell).collect();
    let rows = data
        .iter()
        .map(|line| {
            let cells: Vec<String> = line.split(',').map(clean_cell).collect();
            headers
                .iter()
                .enumerate()
                .map(|(idx, h)| {
                    let cell = cells.get(idx).cloned().unwrap_or_default();
                    (h.clone(), Value::String(cell))
                })
                .collect::<Row>()
        })
        .collect::<Vec<_>>();

    debug!(rows = rows.len(), columns = headers.len(), "parsed table");
    Ok(rows)
}

fn clean_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    let inner = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    if inner.len() + 2 == trimmed.len() {
        inner.replace("\"\"", "\"")
    } else {
        inner.to_string()
    }
}

/// Convert typed records into rows for [`to_table`].
///
/// List and object columns are flattened to text without commas or quotes.
pub fn rows_from_records<T: Serialize>(records: &[T]) -> Result<Vec<Row>, CodecError> {
    records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(row) => Ok(row
                .into_iter()
                .map(|(key, value)| match flat_text(&value) {
                    Some(text) => (key, Value::String(text)),
                    None => (key, value),
                })
                .collect()),
            other => Ok(Row::from_iter([("value".to_string(), other)])),
        })
        .collect()
}

/// Decode imported rows into typed records.
///
/// Rows without an `id` get a fresh one and rows without a creation timestamp
/// are stamped with `now`. Numeric and list columns accept their text form; a
/// blank optional text column decodes as an empty string, as the forms store it.
///
/// # Errors
///
/// Returns [`CodecError::InvalidRecord`] for the first row that does not match
/// the record schema.
pub fn records_from_rows<T: Record>(
    rows: Vec<Row>,
    now: OffsetDateTime,
) -> Result<Vec<T>, CodecError> {
    let stamp = creation_timestamp(now);
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, mut row)| {
            fill_if_blank(&mut row, "id", new_record_id);
            fill_if_blank(&mut row, "dataCriacao", || stamp.clone());
            serde_json::from_value::<T>(Value::Object(row)).map_err(|source| {
                CodecError::InvalidRecord {
                    collection: T::COLLECTION.key(),
                    index,
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        collection = T::COLLECTION.key(),
        records = records.len(),
        "decoded imported rows"
    );
    Ok(records)
}

fn fill_if_blank(row: &mut Row, key: &str, value: impl FnOnce() -> String) {
    let blank = match row.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if blank {
        row.insert(key.to_string(), Value::String(value()));
    }
}
