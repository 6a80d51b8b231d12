//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question at position {position}: question text cannot be empty")]
    EmptyQuestion { position: usize },

    #[error("Conversation payload is missing {0}")]
    IncompleteConversation(&'static str),

    #[error("Empty batch: no questions to dispatch")]
    EmptyBatch,
}

impl DomainError {
    /// Check if this error is attributable to a single input row
    pub fn is_row_level(&self) -> bool {
        matches!(self, DomainError::EmptyQuestion { .. })
    }
}
