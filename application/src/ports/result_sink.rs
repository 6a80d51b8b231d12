//! Result sink port
//!
//! Persists the collected `{question, answer}` rows.

use botbatch_domain::Answer;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("No answers to persist to {0}")]
    Empty(PathBuf),

    #[error("Cannot write results to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Port for persisting results.
///
/// Implementations must reject an empty result set with [`SinkError::Empty`]
/// instead of silently writing nothing.
pub trait ResultSink: Send + Sync {
    fn persist(&self, answers: &[Answer], output: &Path) -> Result<(), SinkError>;
}
