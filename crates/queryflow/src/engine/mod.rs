pub mod athena;

use async_trait::async_trait;
use std::fmt;

pub use athena::AthenaEngine;

/// Opaque id handed back by the engine when a query is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryJobHandle(String);

impl QueryJobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryJobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Queued => "queued",
            QueryStatus::Running => "running",
            QueryStatus::Succeeded => "succeeded",
            QueryStatus::Failed => "failed",
            QueryStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QueryStatus::Succeeded | QueryStatus::Failed | QueryStatus::Cancelled
        )
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a job's state, plus whatever reason the engine gave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: QueryStatus,
    pub reason: Option<String>,
}

impl StatusSnapshot {
    pub fn new(status: QueryStatus) -> Self {
        Self {
            status,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// SQL text; caller values appear only as `?` placeholders.
    pub sql: String,
    /// Positional literals bound to the placeholders, already SQL-quoted.
    pub parameters: Vec<String>,
    pub output_location: String,
    pub workgroup: Option<String>,
    /// Idempotency token so a resent submission does not start a second job.
    pub client_request_token: String,
}

/// One result row; columns can be null.
pub type RawResultRow = Vec<Option<String>>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{message}")]
    Service { message: String },

    #[error("engine response is missing `{0}`")]
    MissingField(&'static str),
}

impl EngineError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }
}

/// The remote SQL engine as the orchestrator sees it.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn submit(&self, request: QueryRequest) -> Result<QueryJobHandle, EngineError>;

    async fn status(&self, handle: &QueryJobHandle) -> Result<StatusSnapshot, EngineError>;

    /// First page of the result set, header row included.
    async fn results(&self, handle: &QueryJobHandle) -> Result<Vec<RawResultRow>, EngineError>;

    async fn cancel(&self, handle: &QueryJobHandle) -> Result<(), EngineError>;
}
