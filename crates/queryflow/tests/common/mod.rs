use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use queryflow::engine::{
    EngineError, QueryEngine, QueryJobHandle, QueryRequest, QueryStatus, RawResultRow,
    StatusSnapshot,
};
use queryflow::jobs::{OrchestratorConfig, PollConfig, QueryOrchestrator};

#[allow(dead_code)]
pub const HEADER: [&str; 4] = ["name", "data", "status", "erro"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Submit,
    Status,
    Results,
    Cancel,
}

#[derive(Default)]
struct Script {
    handle: String,
    submit_error: Option<String>,
    statuses: VecDeque<Result<StatusSnapshot, String>>,
    // replayed once `statuses` runs dry
    last_status: Option<Result<StatusSnapshot, String>>,
    rows: Vec<RawResultRow>,
    results_error: Option<String>,
    cancel_error: Option<String>,
    calls: Vec<Call>,
    submitted: Vec<QueryRequest>,
}

/// In-memory engine that plays back canned responses and records calls.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    inner: Arc<Mutex<Script>>,
}

#[allow(dead_code)]
impl ScriptedEngine {
    pub fn new(handle: &str) -> Self {
        let engine = Self::default();
        engine.inner.lock().unwrap().handle = handle.to_string();
        engine
    }

    pub fn with_statuses(self, statuses: &[QueryStatus]) -> Self {
        {
            let mut s = self.inner.lock().unwrap();
            for st in statuses {
                s.statuses.push_back(Ok(StatusSnapshot::new(*st)));
            }
        }
        self
    }

    pub fn with_snapshot(self, snapshot: StatusSnapshot) -> Self {
        self.inner.lock().unwrap().statuses.push_back(Ok(snapshot));
        self
    }

    pub fn with_status_error(self, message: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .statuses
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_submit_error(self, message: &str) -> Self {
        self.inner.lock().unwrap().submit_error = Some(message.to_string());
        self
    }

    pub fn with_results_error(self, message: &str) -> Self {
        self.inner.lock().unwrap().results_error = Some(message.to_string());
        self
    }

    pub fn with_cancel_error(self, message: &str) -> Self {
        self.inner.lock().unwrap().cancel_error = Some(message.to_string());
        self
    }

    pub fn with_rows(self, rows: Vec<RawResultRow>) -> Self {
        self.inner.lock().unwrap().rows = rows;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    pub fn submitted(&self) -> Vec<QueryRequest> {
        self.inner.lock().unwrap().submitted.clone()
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn submit(&self, request: QueryRequest) -> Result<QueryJobHandle, EngineError> {
        let mut s = self.inner.lock().unwrap();
        s.calls.push(Call::Submit);
        s.submitted.push(request);
        match &s.submit_error {
            Some(msg) => Err(EngineError::service(msg.clone())),
            None => Ok(QueryJobHandle::new(s.handle.clone())),
        }
    }

    async fn status(&self, _handle: &QueryJobHandle) -> Result<StatusSnapshot, EngineError> {
        let mut s = self.inner.lock().unwrap();
        s.calls.push(Call::Status);
        let next = match s.statuses.pop_front() {
            Some(next) => {
                s.last_status = Some(next.clone());
                next
            }
            None => s
                .last_status
                .clone()
                .unwrap_or_else(|| Ok(StatusSnapshot::new(QueryStatus::Running))),
        };
        next.map_err(EngineError::service)
    }

    async fn results(&self, _handle: &QueryJobHandle) -> Result<Vec<RawResultRow>, EngineError> {
        let mut s = self.inner.lock().unwrap();
        s.calls.push(Call::Results);
        match &s.results_error {
            Some(msg) => Err(EngineError::service(msg.clone())),
            None => Ok(s.rows.clone()),
        }
    }

    async fn cancel(&self, _handle: &QueryJobHandle) -> Result<(), EngineError> {
        let mut s = self.inner.lock().unwrap();
        s.calls.push(Call::Cancel);
        match &s.cancel_error {
            Some(msg) => Err(EngineError::service(msg.clone())),
            None => Ok(()),
        }
    }
}

#[allow(dead_code)]
pub fn row(cols: &[&str]) -> RawResultRow {
    cols.iter().map(|c| Some(c.to_string())).collect()
}

#[allow(dead_code)]
pub fn header() -> RawResultRow {
    row(&HEADER)
}

#[allow(dead_code)]
pub fn orchestrator_config() -> OrchestratorConfig {
    OrchestratorConfig {
        table: "tb_teste".to_string(),
        output_location: "s3://bucket-teste/query-results/".to_string(),
        workgroup: None,
        poll: PollConfig::new(Duration::from_secs(25), Duration::from_secs(1)).unwrap(),
        cancel_on_timeout: true,
    }
}

#[allow(dead_code)]
pub fn orchestrator(engine: &ScriptedEngine) -> QueryOrchestrator {
    QueryOrchestrator::new(Arc::new(engine.clone()), orchestrator_config())
}
