//! Direct Line configuration from TOML (`[directline]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TOKEN_URL: &str =
    "https://directline.botframework.com/v3/directline/tokens/generate";
pub const DEFAULT_CONVERSATIONS_URL: &str =
    "https://directline.botframework.com/v3/directline/conversations";

/// Raw Direct Line configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDirectLineConfig {
    pub token_url: String,
    pub conversations_url: String,
    /// Bot secret exchanged for conversation tokens. Usually set through
    /// `BOTBATCH_DIRECTLINE__BOT_SECRET` rather than a file.
    pub bot_secret: String,
    /// Timeout for each REST call
    pub request_timeout_seconds: u64,
}

impl Default for FileDirectLineConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            conversations_url: DEFAULT_CONVERSATIONS_URL.to_string(),
            bot_secret: String::new(),
            request_timeout_seconds: 30,
        }
    }
}

impl FileDirectLineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
