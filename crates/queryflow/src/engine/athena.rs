use async_trait::async_trait;
use aws_sdk_athena::types::{QueryExecutionState, ResultConfiguration, Row};
use aws_sdk_athena::Client as AthenaClient;
use aws_sdk_athena::error::DisplayErrorContext;

use super::{
    EngineError, QueryEngine, QueryJobHandle, QueryRequest, QueryStatus, RawResultRow,
    StatusSnapshot,
};

/// `QueryEngine` backed by AWS Athena.
///
/// The client is cheap to clone and safe for concurrent use, so one
/// `AthenaEngine` is built at startup and shared by every request.
#[derive(Clone)]
pub struct AthenaEngine {
    client: AthenaClient,
}

impl AthenaEngine {
    pub fn new(client: AthenaClient) -> Self {
        Self { client }
    }
}

fn sdk_err<E>(e: E) -> EngineError
where
    E: std::error::Error,
{
    EngineError::service(DisplayErrorContext(e).to_string())
}

fn map_state(state: &QueryExecutionState) -> QueryStatus {
    match state {
        QueryExecutionState::Queued => QueryStatus::Queued,
        QueryExecutionState::Running => QueryStatus::Running,
        QueryExecutionState::Succeeded => QueryStatus::Succeeded,
        QueryExecutionState::Failed => QueryStatus::Failed,
        QueryExecutionState::Cancelled => QueryStatus::Cancelled,
        // neither done nor failed: keep polling
        other => {
            tracing::debug!(state = %other.as_str(), "unrecognized athena state, treating as running");
            QueryStatus::Running
        }
    }
}

// null cells stay `None` so the row parser can report the column
fn row_values(row: &Row) -> RawResultRow {
    row.data()
        .iter()
        .map(|d| d.var_char_value().map(str::to_string))
        .collect()
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn submit(&self, request: QueryRequest) -> Result<QueryJobHandle, EngineError> {
        let QueryRequest {
            sql,
            parameters,
            output_location,
            workgroup,
            client_request_token,
        } = request;

        let out = self
            .client
            .start_query_execution()
            .query_string(sql)
            .set_execution_parameters(Some(parameters))
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            )
            .set_work_group(workgroup)
            .client_request_token(client_request_token)
            .send()
            .await
            .map_err(sdk_err)?;

        let id = out
            .query_execution_id()
            .ok_or(EngineError::MissingField("QueryExecutionId"))?;

        Ok(QueryJobHandle::new(id))
    }

    async fn status(&self, handle: &QueryJobHandle) -> Result<StatusSnapshot, EngineError> {
        let out = self
            .client
            .get_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(sdk_err)?;

        let status = out
            .query_execution()
            .and_then(|q| q.status())
            .ok_or(EngineError::MissingField("QueryExecution.Status"))?;

        let state = status
            .state()
            .ok_or(EngineError::MissingField("QueryExecution.Status.State"))?;

        let mut snapshot = StatusSnapshot::new(map_state(state));
        if let Some(reason) = status.state_change_reason() {
            snapshot = snapshot.with_reason(reason);
        }
        Ok(snapshot)
    }

    async fn results(&self, handle: &QueryJobHandle) -> Result<Vec<RawResultRow>, EngineError> {
        // single page only; NextToken is ignored
        let out = self
            .client
            .get_query_results()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(sdk_err)?;

        let rows = out
            .result_set()
            .ok_or(EngineError::MissingField("ResultSet"))?
            .rows()
            .iter()
            .map(row_values)
            .collect();

        Ok(rows)
    }

    async fn cancel(&self, handle: &QueryJobHandle) -> Result<(), EngineError> {
        self.client
            .stop_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(sdk_err)?;
        Ok(())
    }
}
