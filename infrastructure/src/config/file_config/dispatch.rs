//! Dispatch configuration from TOML (`[dispatch]` section)

use botbatch_application::DispatchParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Concurrent workers
    pub workers: usize,
    /// Per-question deadline
    pub timeout_seconds: u64,
    /// Cap on a single receive attempt while waiting for a reply
    pub poll_interval_ms: u64,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        let params = DispatchParams::default();
        Self {
            workers: params.workers,
            timeout_seconds: params.timeout.as_secs(),
            poll_interval_ms: params.poll_interval.as_millis() as u64,
        }
    }
}

impl FileDispatchConfig {
    pub fn to_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_workers(self.workers)
            .with_timeout(Duration::from_secs(self.timeout_seconds))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }
}
