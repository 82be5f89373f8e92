use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use queryflow::api;
use queryflow::config;
use queryflow::engine::AthenaEngine;
use queryflow::jobs::QueryOrchestrator;
use queryflow::observability::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::Config::from_env()?;
    init_logging(cfg.log_format);

    tracing::info!(
        listen_addr = %cfg.listen_addr,
        region = %cfg.region,
        table = %cfg.table,
        workgroup = cfg.workgroup.as_deref().unwrap_or("default"),
        poll_timeout_ms = cfg.poll_timeout.as_millis() as u64,
        poll_interval_ms = cfg.poll_interval.as_millis() as u64,
        cancel_on_timeout = cfg.cancel_on_timeout,
        "queryflow gateway starting"
    );

    // credentials come from the default provider chain
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(cfg.region.clone()))
        .load()
        .await;
    let engine = AthenaEngine::new(aws_sdk_athena::Client::new(&sdk_config));

    let orchestrator = QueryOrchestrator::new(Arc::new(engine), cfg.orchestrator_config()?);
    let app = api::router(api::ApiState {
        orchestrator: Arc::new(orchestrator),
    });

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("listening on http://{}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
