use std::sync::Arc;

use uuid::Uuid;

use crate::engine::{QueryEngine, QueryJobHandle, QueryRequest};
use crate::jobs::error::{QueryError, RemoteOperation};
use crate::jobs::model::EventRecord;
use crate::jobs::poller::{PollConfig, QueryPoller};
use crate::jobs::rows::parse_result_set;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub table: String,
    pub output_location: String,
    pub workgroup: Option<String>,
    pub poll: PollConfig,
    pub cancel_on_timeout: bool,
}

/// Runs one lookup end to end: submit, poll, fetch, parse.
#[derive(Clone)]
pub struct QueryOrchestrator {
    engine: Arc<dyn QueryEngine>,
    cfg: OrchestratorConfig,
}

impl QueryOrchestrator {
    pub fn new(engine: Arc<dyn QueryEngine>, cfg: OrchestratorConfig) -> Self {
        Self { engine, cfg }
    }

    pub async fn execute(&self, id: &str) -> Result<Vec<EventRecord>, QueryError> {
        if id.trim().is_empty() {
            return Err(QueryError::Validation("id is required".into()));
        }

        let handle = self
            .engine
            .submit(self.build_request(id))
            .await
            .map_err(QueryError::remote(RemoteOperation::Submit))?;

        tracing::info!(handle = %handle, table = %self.cfg.table, "submitted query");

        let poller = QueryPoller::new(&*self.engine, self.cfg.poll);
        match poller.await_completion(&handle).await {
            Ok(_) => {}
            Err(e @ QueryError::DeadlineExceeded { .. }) => {
                if self.cfg.cancel_on_timeout {
                    self.cancel_best_effort(&handle).await;
                }
                return Err(e);
            }
            Err(e) => return Err(e),
        }

        let rows = self
            .engine
            .results(&handle)
            .await
            .map_err(QueryError::remote(RemoteOperation::Results))?;

        let events = parse_result_set(&rows)?;

        tracing::info!(handle = %handle, rows = events.len(), "query completed");
        Ok(events)
    }

    pub fn build_request(&self, id: &str) -> QueryRequest {
        QueryRequest {
            sql: format!("SELECT * FROM {} WHERE id = ?", self.cfg.table),
            parameters: vec![sql_string_literal(id)],
            output_location: self.cfg.output_location.clone(),
            workgroup: self.cfg.workgroup.clone(),
            client_request_token: Uuid::new_v4().to_string(),
        }
    }

    async fn cancel_best_effort(&self, handle: &QueryJobHandle) {
        match self.engine.cancel(handle).await {
            Ok(()) => tracing::info!(handle = %handle, "cancelled query after deadline"),
            Err(e) => tracing::warn!(handle = %handle, error = %e, "failed to cancel query after deadline"),
        }
    }
}

/// Quote a value as a SQL string literal for an execution parameter.
pub fn sql_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
