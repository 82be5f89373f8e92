use serde::Deserialize;
use serde_json::{Map, Value};

use crate::engine::RawResultRow;
use crate::jobs::error::QueryError;
use crate::jobs::model::{ErrorDetail, EventRecord};

const COLUMNS: [&str; 4] = ["name", "data", "status", "erro"];

const ERRORS_KEY: &str = "erros";

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    descricao: String,
}

/// Parse one data row. `row_no` is 1-based and only used in errors.
pub fn parse_row(row: &RawResultRow, row_no: usize) -> Result<EventRecord, QueryError> {
    let name = column(row, row_no, 0)?;
    let occurred_at = column(row, row_no, 1)?;
    let status = column(row, row_no, 2)?;
    let payload = column(row, row_no, 3)?;

    let error_detail = parse_error_payload(payload)
        .map_err(|source| QueryError::MalformedPayload {
            row: row_no,
            source,
        })?;

    Ok(EventRecord {
        name: name.to_string(),
        occurred_at: occurred_at.to_string(),
        status: status.to_string(),
        error_detail,
    })
}

fn column(row: &RawResultRow, row_no: usize, idx: usize) -> Result<&str, QueryError> {
    row.get(idx)
        .and_then(|c| c.as_deref())
        .ok_or(QueryError::MissingColumn {
            row: row_no,
            column: COLUMNS[idx],
        })
}

/// Parse every row after the header, in order. Any bad row fails the batch.
pub fn parse_result_set(rows: &[RawResultRow]) -> Result<Vec<EventRecord>, QueryError> {
    rows.iter()
        .enumerate()
        .skip(1)
        .map(|(row_no, row)| parse_row(row, row_no))
        .collect()
}

/// First `erros[].descricao` found in the payload, if any.
///
/// The payload has to be a JSON object (`null` counts as empty). Shape
/// mismatches below the top level mean "no detail", not an error.
pub fn parse_error_payload(text: &str) -> Result<Option<ErrorDetail>, serde_json::Error> {
    let doc: Option<Map<String, Value>> = serde_json::from_str(text)?;

    let Some(Value::Array(entries)) = doc.as_ref().and_then(|d| d.get(ERRORS_KEY)) else {
        return Ok(None);
    };

    let detail = entries
        .iter()
        .filter(|e| e.is_object())
        .find_map(|e| ErrorEntry::deserialize(e).ok())
        .map(|e| ErrorDetail {
            description: e.descricao,
        });

    Ok(detail)
}
