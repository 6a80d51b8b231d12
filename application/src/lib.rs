//! Application layer for botbatch
//!
//! This crate contains use cases, port definitions, run metrics and dispatch
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod metrics;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DispatchParams, DispatchParamsError};
pub use metrics::{FailureCounts, MetricsSnapshot, RunMetrics};
pub use ports::{
    bot_gateway::{BotGateway, GatewayError, ReplyStream},
    exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger},
    progress::{BatchProgressNotifier, NoProgress},
    question_source::{QuestionQuery, QuestionSource, SourceError},
    result_sink::{ResultSink, SinkError},
};
pub use use_cases::dispatch_questions::{DispatchQuestionsUseCase, DispatchReport};
pub use use_cases::exchange_question::ExchangeQuestionUseCase;
pub use use_cases::listen_for_answer::{AnswerListener, ListenOutcome};
pub use use_cases::run_batch::{BatchReport, RunBatchError, RunBatchInput, RunBatchUseCase};
