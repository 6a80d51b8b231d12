//! Direct Line adapter
//!
//! Implements the [`BotGateway`](botbatch_application::BotGateway) port over
//! the Direct Line v3 protocol: token and conversation bootstrap through
//! REST calls, user messages posted as activities, bot replies received on
//! the conversation's WebSocket stream.

pub mod client;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod stream;
