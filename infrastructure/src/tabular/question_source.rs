//! Question source backed by a CSV file with a header row.

use botbatch_application::ports::question_source::{QuestionQuery, QuestionSource, SourceError};
use botbatch_domain::Question;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvQuestionSource;

impl CsvQuestionSource {
    pub fn new() -> Self {
        Self
    }
}

fn unreadable(path: &Path, e: impl std::fmt::Display) -> SourceError {
    SourceError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl QuestionSource for CsvQuestionSource {
    fn load(&self, query: &QuestionQuery) -> Result<Vec<Question>, SourceError> {
        let path = query.path.as_path();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| unreadable(path, e))?;

        // Spreadsheet exports often carry a byte order mark on the first header.
        let column = reader
            .headers()
            .map_err(|e| unreadable(path, e))?
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == query.column)
            .ok_or_else(|| SourceError::MissingColumn {
                path: path.to_path_buf(),
                column: query.column.clone(),
            })?;

        let mut questions = Vec::new();
        for (position, record) in reader.records().enumerate() {
            let record = record.map_err(|e| unreadable(path, e))?;
            let text = record.get(column).unwrap_or_default().trim();
            match Question::new(position, text) {
                Ok(question) => questions.push(question),
                Err(e) => warn!("{}: skipping row: {}", path.display(), e),
            }
        }

        debug!(
            "Read {} questions from column '{}' of {}",
            questions.len(),
            query.column,
            path.display()
        );
        Ok(questions)
    }
}
