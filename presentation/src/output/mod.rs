//! Output formatting for batch summaries

pub mod console;
