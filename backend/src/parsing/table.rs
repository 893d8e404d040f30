//! Conversion of a row-oriented deposit table into [`DepositRecord`]s.
//!
//! Every row must carry all required columns. Numeric columns may be `null`
//! (or numeric strings, as produced by some exporters). An optional `index`
//! column overrides the row position as the record key.

use serde_json::{Map, Value};

use crate::api::RecordIndex;
use crate::error::{GtModelError, GtModelResult};
use crate::models::DepositRecord;

/// Columns every input row must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "ms",
    "ms_name",
    "commodity",
    "top1_deposit_name",
    "lat",
    "lon",
    "total_grade",
    "total_tonnage",
    "total_contained_metal",
];

/// Parse a JSON array of row objects.
pub fn parse_table_json(json: &str) -> GtModelResult<Vec<DepositRecord>> {
    let rows: Vec<Value> = serde_json::from_str(json).map_err(|e| GtModelError::InvalidValue {
        column: "table",
        row: 0,
        message: e.to_string(),
    })?;
    parse_rows(&rows)
}

/// Validate and convert rows. Stops at the first invalid row.
pub fn parse_rows(rows: &[Value]) -> GtModelResult<Vec<DepositRecord>> {
    rows.iter()
        .enumerate()
        .map(|(row, value)| {
            let object = value.as_object().ok_or_else(|| GtModelError::InvalidValue {
                column: "row",
                row,
                message: "expected an object".to_string(),
            })?;
            parse_row(row, object)
        })
        .collect()
}

fn parse_row(row: usize, object: &Map<String, Value>) -> GtModelResult<DepositRecord> {
    if let Some(column) = REQUIRED_COLUMNS.iter().find(|c| !object.contains_key(**c)) {
        return Err(GtModelError::MissingColumn {
            column: *column,
            row,
        });
    }

    let index = match object.get("index") {
        None | Some(Value::Null) => RecordIndex(row),
        Some(value) => value
            .as_u64()
            .map(|i| RecordIndex(i as usize))
            .ok_or_else(|| GtModelError::InvalidValue {
                column: "index",
                row,
                message: format!("expected a non-negative integer, got {}", value),
            })?,
    };

    let mut record = DepositRecord {
        index,
        ms: text(object, "ms", row)?,
        ms_name: text(object, "ms_name", row)?,
        commodity: text(object, "commodity", row)?,
        top1_deposit_name: text(object, "top1_deposit_name", row)?,
        lat: number(object, "lat", row)?.map(qtty::Degrees::new),
        lon: number(object, "lon", row)?.map(qtty::Degrees::new),
        total_grade: number(object, "total_grade", row)?,
        total_tonnage: number(object, "total_tonnage", row)?,
        total_contained_metal: number(object, "total_contained_metal", row)?,
    };
    record.normalize_deposit_type();
    Ok(record)
}

fn text(object: &Map<String, Value>, column: &'static str, row: usize) -> GtModelResult<String> {
    match object.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Ok(String::new()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(GtModelError::InvalidValue {
            column,
            row,
            message: format!("expected text, got {}", other),
        }),
    }
}

fn number(
    object: &Map<String, Value>,
    column: &'static str,
    row: usize,
) -> GtModelResult<Option<f64>> {
    match object.get(column) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => {
            s.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| GtModelError::InvalidValue {
                    column,
                    row,
                    message: format!("expected a number, got '{}'", s),
                })
        }
        Some(other) => Err(GtModelError::InvalidValue {
            column,
            row,
            message: format!("expected a number, got {}", other),
        }),
    }
}
