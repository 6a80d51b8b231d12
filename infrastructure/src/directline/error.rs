//! Error types for the Direct Line adapter

use thiserror::Error;

/// Result type alias for Direct Line operations
pub type Result<T> = std::result::Result<T, DirectLineError>;

/// Errors that can occur when talking to the Direct Line service
#[derive(Error, Debug)]
pub enum DirectLineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl DirectLineError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            DirectLineError::Status { status, .. } => Some(*status),
            DirectLineError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
