use serde::Serialize;

/// One event row as returned to HTTP callers.
///
/// Field names on the wire match the event table's consumers:
/// `name`, `data`, `status`, `erro`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub name: String,
    /// ISO-8601 timestamp, passed through as stored.
    #[serde(rename = "data")]
    pub occurred_at: String,
    pub status: String,
    #[serde(rename = "erro")]
    pub error_detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "descricao")]
    pub description: String,
}
