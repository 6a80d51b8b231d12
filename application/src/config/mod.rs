//! Application-level configuration.
//!
//! - [`DispatchParams`]: worker count, per-question timeout, receive poll cap

pub mod dispatch_params;

pub use dispatch_params::{DispatchParams, DispatchParamsError};
