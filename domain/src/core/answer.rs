//! Answer value object

use serde::{Deserialize, Serialize};

/// A question paired with the bot reply that resolved it.
///
/// Serialises to exactly `{"question": ..., "answer": ...}`, the shape the
/// result sink persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

impl Answer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
