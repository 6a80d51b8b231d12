//! Domain layer for botbatch
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Question / Answer**: one row of the input batch and the bot reply
//!   that resolved it.
//! - **Conversation**: a fresh Direct Line conversation per question.
//! - **Activity matching**: the first non-self `message` activity on the
//!   stream is the answer; everything else is ignored.
//! - **Exchange outcome**: answered, timed out, closed, cancelled or failed
//!   at a named stage.

pub mod activity;
pub mod conversation;
pub mod core;
pub mod exchange;

// Re-export commonly used types
pub use activity::{
    Activity, ActivitySet, ChannelAccount, Frame, FrameError, ListenerState, SenderRole,
    decode_frame,
};
pub use conversation::{Conversation, ConversationStarted, Token};
pub use core::{answer::Answer, error::DomainError, question::Question};
pub use exchange::{ExchangeOutcome, Stage, WorkItem};
