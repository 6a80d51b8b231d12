//! Infrastructure layer for botbatch
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod directline;
pub mod logging;
pub mod tabular;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBatchConfig, FileConfig, FileDirectLineConfig,
    FileDispatchConfig, FileLoggingConfig, FileRoutingConfig,
};
pub use directline::{
    client::{DirectLineClient, DirectLineEndpoints},
    error::{DirectLineError, Result},
    gateway::DirectLineGateway,
    protocol::RoutingProfile,
    stream::WebSocketReplyStream,
};
pub use logging::JsonlExchangeLogger;
pub use tabular::{CsvQuestionSource, CsvResultSink};
