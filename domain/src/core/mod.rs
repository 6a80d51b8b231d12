//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: one line of the input batch
//! - [`answer::Answer`]: a question paired with the bot's reply
//! - [`error::DomainError`]: domain-level errors

pub mod answer;
pub mod error;
pub mod question;
