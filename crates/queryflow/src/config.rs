use std::time::Duration;

use crate::jobs::{OrchestratorConfig, PollConfig};
use crate::observability::LogFormat;

// Config is a central place for runtime configuration

// It loads values from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: String,
    pub region: String,
    pub output_location: String,
    pub table: String,
    pub workgroup: Option<String>,
    pub poll_timeout: Duration,
    pub poll_interval: Duration,
    pub cancel_on_timeout: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let output_location = env_or_fallback("QUERYFLOW_OUTPUT_LOCATION", "OUTPUT_LOCATION")
            .ok_or_else(|| anyhow::anyhow!("QUERYFLOW_OUTPUT_LOCATION is missing"))?;

        let listen_addr = env_or_fallback("QUERYFLOW_LISTEN_ADDR", "LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let region = env_or_fallback("QUERYFLOW_AWS_REGION", "AWS_REGION")
            .unwrap_or_else(|| "us-west-2".to_string());

        let table =
            env_or_fallback("QUERYFLOW_TABLE", "EVENTS_TABLE").unwrap_or_else(|| "tb_teste".to_string());

        let workgroup = env_non_empty("QUERYFLOW_WORKGROUP");

        let poll_timeout_secs: u64 = env_parse("QUERYFLOW_POLL_TIMEOUT_SECS")?.unwrap_or(25);

        let poll_interval_ms: u64 = env_parse("QUERYFLOW_POLL_INTERVAL_MS")?.unwrap_or(1000);

        let cancel_on_timeout = env_bool("QUERYFLOW_CANCEL_ON_TIMEOUT").unwrap_or(true);

        let log_format = match env_non_empty("QUERYFLOW_LOG_FORMAT")
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let cfg = Self {
            listen_addr,
            region,
            output_location,
            table,
            workgroup,
            poll_timeout: Duration::from_secs(poll_timeout_secs),
            poll_interval: Duration::from_millis(poll_interval_ms),
            cancel_on_timeout,
            log_format,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.output_location.starts_with("s3://") {
            anyhow::bail!(
                "output location must be an s3:// uri, got {:?}",
                self.output_location
            );
        }
        if !is_table_name(&self.table) {
            anyhow::bail!("invalid table name {:?}", self.table);
        }
        self.poll_config()?;
        Ok(())
    }

    pub fn poll_config(&self) -> anyhow::Result<PollConfig> {
        PollConfig::new(self.poll_timeout, self.poll_interval)
    }

    pub fn orchestrator_config(&self) -> anyhow::Result<OrchestratorConfig> {
        Ok(OrchestratorConfig {
            table: self.table.clone(),
            output_location: self.output_location.clone(),
            workgroup: self.workgroup.clone(),
            poll: self.poll_config()?,
            cancel_on_timeout: self.cancel_on_timeout,
        })
    }
}

// The table name is spliced into SQL text, so only plain dotted identifiers pass.
fn is_table_name(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

// Unset is fine; set but unparsable is a startup error.
fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_non_empty(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{key} has invalid value {raw:?}: {e}"))
        })
        .transpose()
}

fn env_or_fallback(primary: &str, fallback: &str) -> Option<String> {
    env_non_empty(primary).or_else(|| env_non_empty(fallback))
}

fn env_bool(key: &str) -> Option<bool> {
    env_non_empty(key).map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
