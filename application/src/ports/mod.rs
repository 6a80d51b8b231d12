//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod bot_gateway;
pub mod exchange_logger;
pub mod progress;
pub mod question_source;
pub mod result_sink;
