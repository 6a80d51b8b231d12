//! Direct Line activity stream: frames, envelopes and reply matching.
//!
//! The stream carries JSON envelopes of the shape
//! `{"activities": [{"type": "message", "from": {"role": "bot"}, "text": "..."}]}`.
//! This module decodes raw frames into [`ActivitySet`]s and decides which
//! activity (if any) is the bot's reply to the pending question.

pub mod envelope;
pub mod frame;
pub mod state;

pub use envelope::{Activity, ActivitySet, ChannelAccount, SenderRole};
pub use frame::{Frame, FrameError, decode_frame};
pub use state::ListenerState;
