use std::time::Duration;

use crate::engine::{QueryEngine, QueryJobHandle, QueryStatus};
use crate::jobs::error::{QueryError, RemoteOperation};

/// Poll timing. Only built through `new` or `Default`, so the interval is
/// always non-zero and no longer than the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    timeout: Duration,
    interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(25),
            interval: Duration::from_secs(1),
        }
    }
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> anyhow::Result<Self> {
        if interval.is_zero() {
            anyhow::bail!("poll interval must be > 0");
        }
        if interval > timeout {
            anyhow::bail!("poll interval ({interval:?}) must not exceed timeout ({timeout:?})");
        }
        Ok(Self { timeout, interval })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// floor(timeout / interval), at least one.
    pub fn max_checks(&self) -> u32 {
        let n = self.timeout.as_nanos() / self.interval.as_nanos().max(1);
        n.clamp(1, u32::MAX as u128) as u32
    }
}

/// Waits for a submitted job to reach a terminal state.
///
/// The wait happens inside the caller's future; nothing is spawned.
pub struct QueryPoller<'a> {
    engine: &'a dyn QueryEngine,
    cfg: PollConfig,
}

impl<'a> QueryPoller<'a> {
    pub fn new(engine: &'a dyn QueryEngine, cfg: PollConfig) -> Self {
        Self { engine, cfg }
    }

    pub async fn await_completion(&self, handle: &QueryJobHandle) -> Result<QueryStatus, QueryError> {
        let max_checks = self.cfg.max_checks();
        let mut elapsed = Duration::ZERO;
        let mut checks: u32 = 0;

        loop {
            // a failing status call is not retried
            let snapshot = self
                .engine
                .status(handle)
                .await
                .map_err(QueryError::remote(RemoteOperation::Status))?;
            checks += 1;

            tracing::debug!(
                handle = %handle,
                status = %snapshot.status,
                checks,
                elapsed_ms = elapsed.as_millis() as u64,
                "polled query status"
            );

            if snapshot.status.is_terminal() {
                if snapshot.status == QueryStatus::Succeeded {
                    return Ok(QueryStatus::Succeeded);
                }
                return Err(QueryError::TerminalFailure {
                    handle: handle.clone(),
                    status: snapshot.status,
                    reason: snapshot.reason,
                });
            }

            tokio::time::sleep(self.cfg.interval()).await;
            elapsed += self.cfg.interval();

            if checks >= max_checks {
                return Err(QueryError::DeadlineExceeded {
                    handle: handle.clone(),
                    timeout: self.cfg.timeout(),
                    checks,
                });
            }
        }
    }
}
