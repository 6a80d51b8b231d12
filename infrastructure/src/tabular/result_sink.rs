//! Result sink writing `question,answer` rows to a CSV file.

use botbatch_application::ports::result_sink::{ResultSink, SinkError};
use botbatch_domain::Answer;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvResultSink;

impl CsvResultSink {
    pub fn new() -> Self {
        Self
    }
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> SinkError {
    SinkError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl ResultSink for CsvResultSink {
    /// Refuses an empty result set rather than writing a header-only file.
    fn persist(&self, answers: &[Answer], output: &Path) -> Result<(), SinkError> {
        if answers.is_empty() {
            return Err(SinkError::Empty(output.to_path_buf()));
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| write_error(output, e))?;
        }

        let mut writer = csv::Writer::from_path(output).map_err(|e| write_error(output, e))?;
        for answer in answers {
            writer
                .serialize(answer)
                .map_err(|e| write_error(output, e))?;
        }
        writer.flush().map_err(|e| write_error(output, e))?;

        debug!("Wrote {} rows to {}", answers.len(), output.display());
        Ok(())
    }
}
