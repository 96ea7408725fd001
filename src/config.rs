use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Runtime-tunable knobs external to the matching core itself: store
/// location, bind address, and the persistence pipeline's batching
/// cadence. Loaded from environment variables prefixed `ENGINE_`, e.g.
/// `ENGINE_FLUSH_INTERVAL_MS=50`. Kept to plain fields, no macro-derived
/// validation beyond the `thiserror`/`serde` already used elsewhere in
/// this crate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub store_path: String,
    pub bind_addr: String,
    pub flush_interval_ms: u64,
    pub flush_batch_threshold: usize,
    pub persistence_queue_capacity: usize,
    pub webhook_timeout_ms: u64,
    /// Shared secret gating `register_broker`. This repo's outer layer is
    /// thin enough that the check lives in `api.rs` directly rather than a
    /// separate auth service.
    pub admin_token: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_path: "trade_store".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            flush_interval_ms: 30,
            flush_batch_threshold: 256,
            persistence_queue_capacity: 100_000,
            webhook_timeout_ms: 2_000,
            admin_token: "change-me".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms)
    }

    /// Loads overrides from `ENGINE_*` environment variables on top of the
    /// defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("ENGINE"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.flush_interval(), Duration::from_millis(30));
        assert!(cfg.persistence_queue_capacity > 0);
    }
}
