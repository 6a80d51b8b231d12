//! Conversation lifecycle value objects.
//!
//! A [`Conversation`] is created fresh for every question and discarded once
//! that question resolves. It is never shared between exchanges.

use crate::core::error::DomainError;
use serde::Deserialize;

/// Short-lived Direct Line bearer credential.
///
/// Valid for the lifetime of one conversation; no expiry is tracked.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token(<{} bytes redacted>)", self.0.len())
    }
}

/// Raw `start conversation` payload as returned by the service.
///
/// Both fields are optional on the wire; [`Conversation::from_started`]
/// decides whether the payload is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStarted {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
}

/// An open bot conversation (id, single-use stream URL, token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    conversation_id: String,
    stream_url: String,
    token: Token,
}

impl Conversation {
    /// Validate a started-conversation payload.
    ///
    /// Missing or empty `conversationId`/`streamUrl` is fatal for this
    /// question only.
    pub fn from_started(started: ConversationStarted, token: Token) -> Result<Self, DomainError> {
        let conversation_id = started
            .conversation_id
            .filter(|s| !s.is_empty())
            .ok_or(DomainError::IncompleteConversation("conversationId"))?;
        let stream_url = started
            .stream_url
            .filter(|s| !s.is_empty())
            .ok_or(DomainError::IncompleteConversation("streamUrl"))?;

        Ok(Self {
            conversation_id,
            stream_url,
            token,
        })
    }

    pub fn id(&self) -> &str {
        &self.conversation_id
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}
