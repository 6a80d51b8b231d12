//! Run Batch use case
//!
//! Load questions -> dispatch -> persist answers. Only failures of the
//! batch as a whole (parameters, source, sink) surface as errors; lost
//! questions are reported through the metrics.

use crate::config::DispatchParamsError;
use crate::metrics::MetricsSnapshot;
use crate::ports::bot_gateway::BotGateway;
use crate::ports::question_source::{QuestionQuery, QuestionSource, SourceError};
use crate::ports::result_sink::{ResultSink, SinkError};
use crate::use_cases::dispatch_questions::DispatchQuestionsUseCase;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a whole batch
#[derive(Error, Debug)]
pub enum RunBatchError {
    #[error("Invalid dispatch parameters: {0}")]
    InvalidParams(#[from] DispatchParamsError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("No questions found in {0}")]
    EmptyBatch(PathBuf),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Input for the RunBatch use case
#[derive(Debug, Clone)]
pub struct RunBatchInput {
    pub input: PathBuf,
    pub question_column: String,
    pub output: PathBuf,
}

impl RunBatchInput {
    pub fn new(
        input: impl Into<PathBuf>,
        question_column: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            question_column: question_column.into(),
            output: output.into(),
        }
    }
}

/// Summary of a finished batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub answered: usize,
    pub timed_out: usize,
    pub closed: usize,
    pub failed: usize,
    pub workers: usize,
    pub elapsed_seconds: f64,
    pub output: PathBuf,
    pub metrics: MetricsSnapshot,
}

impl BatchReport {
    pub fn lost(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}

/// Use case for running a full question batch end to end
pub struct RunBatchUseCase<G: BotGateway + 'static> {
    source: Arc<dyn QuestionSource>,
    sink: Arc<dyn ResultSink>,
    dispatcher: DispatchQuestionsUseCase<G>,
}

impl<G: BotGateway + 'static> RunBatchUseCase<G> {
    pub fn new(
        source: Arc<dyn QuestionSource>,
        sink: Arc<dyn ResultSink>,
        dispatcher: DispatchQuestionsUseCase<G>,
    ) -> Self {
        Self {
            source,
            sink,
            dispatcher,
        }
    }

    pub async fn execute(&self, input: RunBatchInput) -> Result<BatchReport, RunBatchError> {
        self.dispatcher.params().validate()?;

        let query = QuestionQuery::new(&input.input, &input.question_column);
        let questions = self.source.load(&query)?;
        if questions.is_empty() {
            return Err(RunBatchError::EmptyBatch(input.input));
        }
        let total = questions.len();
        info!(
            "Loaded {} questions from {} (column '{}')",
            total,
            input.input.display(),
            input.question_column
        );

        let report = self.dispatcher.execute(questions).await?;
        let metrics = report.metrics;

        if report.answers.len() < total {
            warn!(
                "{} of {} questions produced no answer",
                total - report.answers.len(),
                total
            );
        }

        self.sink.persist(&report.answers, &input.output)?;
        info!(
            "Wrote {} answers to {}",
            report.answers.len(),
            input.output.display()
        );

        Ok(BatchReport {
            total,
            answered: report.answers.len(),
            timed_out: metrics.timed_out,
            closed: metrics.closed,
            failed: metrics.failed.total() + metrics.cancelled,
            workers: report.sentinels_sent,
            elapsed_seconds: report.elapsed.as_secs_f64(),
            output: input.output,
            metrics,
        })
    }
}
