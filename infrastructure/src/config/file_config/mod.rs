//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into adapter and
//! application types at startup.

mod batch;
mod directline;
mod dispatch;
mod routing;

pub use batch::{FileBatchConfig, FileLoggingConfig};
pub use directline::{DEFAULT_CONVERSATIONS_URL, DEFAULT_TOKEN_URL, FileDirectLineConfig};
pub use dispatch::FileDispatchConfig;
pub use routing::FileRoutingConfig;

use crate::directline::client::DirectLineEndpoints;
use crate::directline::protocol::RoutingProfile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("dispatch.workers must be at least 1")]
    NoWorkers,

    #[error("dispatch.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("dispatch.poll_interval_ms cannot be 0")]
    InvalidPollInterval,

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error(
        "directline.bot_secret is not set (use BOTBATCH_DIRECTLINE__BOT_SECRET or a config file)"
    )]
    MissingSecret,

    #[error("routing.channel_data_env.{key}: environment variable {var} is not set")]
    UnresolvedEnv { key: String, var: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Direct Line service endpoints and credential
    pub directline: FileDirectLineConfig,
    /// Outbound identity and channel data
    pub routing: FileRoutingConfig,
    /// Worker pool settings
    pub dispatch: FileDispatchConfig,
    /// Input / output files
    pub batch: FileBatchConfig,
    /// Diagnostic and transcript logs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration against the process environment,
    /// returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        self.validate_with(|var| std::env::var(var).ok())
    }

    /// Validate with an explicit environment lookup.
    pub fn validate_with<F>(&self, lookup: F) -> Vec<ConfigValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();

        if self.dispatch.workers == 0 {
            issues.push(ConfigValidationError::NoWorkers);
        }
        if self.dispatch.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.dispatch.poll_interval_ms == 0 {
            issues.push(ConfigValidationError::InvalidPollInterval);
        }

        let required = [
            ("directline.token_url", &self.directline.token_url),
            ("directline.conversations_url", &self.directline.conversations_url),
            ("batch.question_column", &self.batch.question_column),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyField { field });
            }
        }
        if self.directline.bot_secret.trim().is_empty() {
            issues.push(ConfigValidationError::MissingSecret);
        }

        if let Err(missing) = self.routing.resolve_channel_data(lookup) {
            issues.extend(missing);
        }

        issues
    }

    pub fn endpoints(&self) -> DirectLineEndpoints {
        DirectLineEndpoints {
            token_url: self.directline.token_url.clone(),
            conversations_url: self.directline.conversations_url.clone(),
        }
    }

    /// Build the outbound routing profile, resolving env-backed channel data.
    pub fn routing_profile(&self) -> Result<RoutingProfile, Vec<ConfigValidationError>> {
        self.routing_profile_with(|var| std::env::var(var).ok())
    }

    pub fn routing_profile_with<F>(
        &self,
        lookup: F,
    ) -> Result<RoutingProfile, Vec<ConfigValidationError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel_data = self.routing.resolve_channel_data(lookup)?;
        Ok(RoutingProfile {
            user_id: self.routing.user_id.clone(),
            user_name: self.routing.user_name.clone(),
            locale: self.routing.locale.clone(),
            channel_data,
        })
    }
}
