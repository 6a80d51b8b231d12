//! CSV adapters for the question source and result sink ports.

mod question_source;
mod result_sink;

pub use question_source::CsvQuestionSource;
pub use result_sink::CsvResultSink;
