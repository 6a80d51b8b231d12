//! Batch and logging configuration from TOML (`[batch]`, `[logging]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw batch configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// CSV file with one question per row
    pub input: PathBuf,
    /// CSV file the answers are written to
    pub output: PathBuf,
    /// Header of the column holding the questions
    pub question_column: String,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("questions.csv"),
            output: PathBuf::from("results.csv"),
            question_column: "QUESTION".to_string(),
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL exchange transcript
    pub exchange_log: Option<PathBuf>,
    /// Directory for daily rolling diagnostic logs
    pub log_dir: Option<PathBuf>,
}
