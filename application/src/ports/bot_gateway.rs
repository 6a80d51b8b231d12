//! Bot gateway port
//!
//! Defines the interface for talking to a conversational bot endpoint:
//! conversation bootstrap over request/response calls, plus a duplex
//! [`ReplyStream`] for inbound activities.

use async_trait::async_trait;
use botbatch_domain::{Conversation, Frame, Stage, Token};
use thiserror::Error;

/// Errors that can occur during bot gateway operations
///
/// Each variant is fatal to one exchange only.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Token request failed (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Conversation error: {0}")]
    Conversation(String),

    #[error("Stream connection failed: {0}")]
    Connect(String),

    #[error("Send failed (status {status}): {body}")]
    Send { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Stage of the per-question flow this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            GatewayError::Auth { .. } => Stage::Token,
            GatewayError::Conversation(_) => Stage::Conversation,
            GatewayError::Connect(_) => Stage::Connect,
            GatewayError::Send { .. } => Stage::Send,
            GatewayError::Transport(_) => Stage::Listen,
        }
    }
}

/// Gateway for bot communication
///
/// Every method performs exactly one round trip (or one connection
/// establishment). Retry policy, if any, belongs to the adapter.
#[async_trait]
pub trait BotGateway: Send + Sync {
    /// Exchange the configured bot credential for a conversation token
    async fn acquire_token(&self) -> Result<Token, GatewayError>;

    /// Start a new conversation authenticated with `token`
    async fn start_conversation(&self, token: &Token) -> Result<Conversation, GatewayError>;

    /// Open the conversation's activity stream
    async fn connect(
        &self,
        conversation: &Conversation,
    ) -> Result<Box<dyn ReplyStream>, GatewayError>;

    /// Post one user message into the conversation
    async fn send(&self, conversation: &Conversation, text: &str) -> Result<(), GatewayError>;
}

/// Inbound side of an open conversation.
///
/// Owned exclusively by the worker that opened it.
#[async_trait]
pub trait ReplyStream: Send {
    /// Wait for the next frame. `Ok(None)` means the stream has ended.
    ///
    /// Must be cancel safe: the listener drops this future when a bounded
    /// receive attempt elapses and calls it again afterwards.
    async fn next_frame(&mut self) -> Result<Option<Frame>, GatewayError>;

    /// Close the stream. Idempotent; errors are swallowed by implementations.
    async fn close(&mut self);
}
