//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A question to send to the bot (Value Object)
///
/// Identified by its text *and* its position in the input batch: the same
/// text may appear several times and each occurrence is an independent
/// exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    position: usize,
    text: String,
}

impl Question {
    /// Create a new question at the given batch position
    ///
    /// Returns [`DomainError::EmptyQuestion`] if the text is empty or only whitespace.
    pub fn new(position: usize, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyQuestion { position });
        }
        Ok(Self { position, text })
    }

    /// Build a batch from raw texts, numbering them in order and skipping blanks
    pub fn batch<I, S>(texts: I) -> Vec<Question>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .filter_map(|(position, text)| Question::new(position, text).ok())
            .collect()
    }

    /// Zero-based position in the input batch
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the inner text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.position, self.text)
    }
}
