use std::time::Duration;

use crate::engine::{EngineError, QueryJobHandle, QueryStatus};

/// Which remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    Submit,
    Status,
    Results,
}

impl RemoteOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteOperation::Submit => "submit",
            RemoteOperation::Status => "status",
            RemoteOperation::Results => "results",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{0}")]
    Validation(String),

    #[error("remote {} call failed: {source}", .operation.as_str())]
    RemoteCall {
        operation: RemoteOperation,
        #[source]
        source: EngineError,
    },

    #[error("query job {handle} ended with status {status}{}", reason_suffix(.reason))]
    TerminalFailure {
        handle: QueryJobHandle,
        status: QueryStatus,
        reason: Option<String>,
    },

    #[error("query job {handle} did not finish within {timeout:?} ({checks} status checks)")]
    DeadlineExceeded {
        handle: QueryJobHandle,
        timeout: Duration,
        checks: u32,
    },

    #[error("row {row}: error payload is not a JSON object: {source}")]
    MalformedPayload {
        row: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("row {row}: column `{column}` is missing or null")]
    MissingColumn { row: usize, column: &'static str },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl QueryError {
    pub fn remote(operation: RemoteOperation) -> impl FnOnce(EngineError) -> Self {
        move |source| QueryError::RemoteCall { operation, source }
    }

    /// Short, caller-safe description; the full error goes to the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            QueryError::Validation(_) => "id is required",
            QueryError::RemoteCall { .. } => "query engine call failed",
            QueryError::TerminalFailure { .. } => "query job failed",
            QueryError::DeadlineExceeded { .. } => "query did not complete in time",
            QueryError::MalformedPayload { .. } | QueryError::MissingColumn { .. } => {
                "query returned a malformed row"
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::Validation(_))
    }
}
