//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch_questions;
pub mod exchange_question;
pub mod listen_for_answer;
pub mod run_batch;

#[cfg(test)]
pub(crate) mod test_support;
