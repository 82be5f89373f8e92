use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::jobs::{EventRecord, QueryError, QueryOrchestrator};

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<QueryOrchestrator>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(missing_id))
        .route("/health", get(health))
        .route("/:id", get(get_events))
        .with_state(state)
}

fn query_err(e: QueryError) -> (StatusCode, String) {
    if e.is_client_error() {
        return (StatusCode::BAD_REQUEST, e.public_message().to_string());
    }

    tracing::error!(error = %e, "event query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        e.public_message().to_string(),
    )
}

pub async fn get_events(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EventRecord>>, (StatusCode, String)> {
    let events = state.orchestrator.execute(&id).await.map_err(query_err)?;
    Ok(Json(events))
}

pub async fn missing_id() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "id is required")
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
