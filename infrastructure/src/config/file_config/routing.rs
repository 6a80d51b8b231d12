//! Routing configuration from TOML (`[routing]` section)
//!
//! Identity stamped on outbound messages plus the opaque `channelData`
//! object. Values in `channel_data_env` name environment variables whose
//! contents are merged into `channel_data` at startup, so per-user secrets
//! stay out of config files.

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw routing configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    pub user_id: String,
    pub user_name: String,
    pub locale: String,
    /// Forwarded verbatim as the activity's `channelData`
    pub channel_data: Map<String, Value>,
    /// channelData key -> environment variable name
    pub channel_data_env: BTreeMap<String, String>,
}

impl Default for FileRoutingConfig {
    fn default() -> Self {
        Self {
            user_id: "tester".to_string(),
            user_name: "tester".to_string(),
            locale: "es-ES".to_string(),
            channel_data: Map::new(),
            channel_data_env: BTreeMap::new(),
        }
    }
}

impl FileRoutingConfig {
    /// Merge `channel_data_env` into `channel_data` using `lookup`.
    ///
    /// Environment values override literal entries with the same key.
    pub fn resolve_channel_data<F>(
        &self,
        lookup: F,
    ) -> Result<Map<String, Value>, Vec<ConfigValidationError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut data = self.channel_data.clone();
        let mut missing = Vec::new();

        for (key, var) in &self.channel_data_env {
            match lookup(var) {
                Some(value) => {
                    data.insert(key.clone(), Value::String(value));
                }
                None => missing.push(ConfigValidationError::UnresolvedEnv {
                    key: key.clone(),
                    var: var.clone(),
                }),
            }
        }

        if missing.is_empty() {
            Ok(data)
        } else {
            Err(missing)
        }
    }
}
