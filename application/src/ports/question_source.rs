//! Question source port
//!
//! Produces the ordered question batch from an input handle and a
//! column/field selector.

use botbatch_domain::Question;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot read question source {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },
}

/// Where to read questions from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub path: PathBuf,
    pub column: String,
}

impl QuestionQuery {
    pub fn new(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
        }
    }
}

/// Port for loading the input batch.
///
/// Failures here abort the batch before any dispatch begins.
pub trait QuestionSource: Send + Sync {
    fn load(&self, query: &QuestionQuery) -> Result<Vec<Question>, SourceError>;
}
