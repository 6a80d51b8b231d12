//! Answer listener state machine.

use serde::Serialize;

/// State of a listener resolving one pending exchange.
///
/// `Waiting` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerState {
    Waiting,
    /// A non-self message arrived; listening stops.
    Matched,
    /// The deadline elapsed without a match.
    TimedOut,
    /// The peer closed the stream, or the transport failed.
    Closed,
    /// The exchange was abandoned (e.g. the concurrent send failed).
    Cancelled,
}

impl ListenerState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ListenerState::Waiting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListenerState::Waiting => "waiting",
            ListenerState::Matched => "matched",
            ListenerState::TimedOut => "timed_out",
            ListenerState::Closed => "closed",
            ListenerState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ListenerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
