//! Raw stream frames and their decoding into [`ActivitySet`]s.

use super::envelope::ActivitySet;
use thiserror::Error;

/// A frame received from the activity stream, independent of the socket
/// library that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Ping/pong and other control frames.
    Control,
    /// The peer closed the stream.
    Close,
}

impl Frame {
    pub fn is_close(&self) -> bool {
        matches!(self, Frame::Close)
    }
}

/// Errors decoding a single frame. Never fatal to the listener.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("frame is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("frame is not a valid activity envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode a frame into an activity envelope.
///
/// Returns `Ok(None)` for frames that carry no envelope at all: control
/// frames, close frames and the empty keep-alive text frames Direct Line
/// sends periodically.
pub fn decode_frame(frame: &Frame) -> Result<Option<ActivitySet>, FrameError> {
    let text = match frame {
        Frame::Text(text) => text.clone(),
        Frame::Binary(bytes) => String::from_utf8(bytes.clone())?,
        Frame::Control | Frame::Close => return Ok(None),
    };

    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(&text)?))
}
