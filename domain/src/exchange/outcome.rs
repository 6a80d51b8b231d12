//! Result of driving one pending exchange to completion.

use crate::core::answer::Answer;
use serde::Serialize;

/// Stage of the per-question flow at which an exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Token,
    Conversation,
    Connect,
    Send,
    Listen,
    /// Unexpected failure caught at the worker boundary (e.g. a panic).
    Worker,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Token => "token",
            Stage::Conversation => "conversation",
            Stage::Connect => "connect",
            Stage::Send => "send",
            Stage::Listen => "listen",
            Stage::Worker => "worker",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a pending exchange resolved.
///
/// Only `Answered` contributes to the result set; every other variant is a
/// lost question, logged but never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Answered(Answer),
    TimedOut,
    Closed,
    Cancelled,
    Failed { stage: Stage, reason: String },
}

impl ExchangeOutcome {
    pub fn failed(stage: Stage, reason: impl Into<String>) -> Self {
        ExchangeOutcome::Failed {
            stage,
            reason: reason.into(),
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, ExchangeOutcome::Answered(_))
    }

    pub fn answer(&self) -> Option<&Answer> {
        match self {
            ExchangeOutcome::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    pub fn into_answer(self) -> Option<Answer> {
        match self {
            ExchangeOutcome::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    /// Short label used in logs and transcripts
    pub fn label(&self) -> &'static str {
        match self {
            ExchangeOutcome::Answered(_) => "answered",
            ExchangeOutcome::TimedOut => "timed_out",
            ExchangeOutcome::Closed => "closed",
            ExchangeOutcome::Cancelled => "cancelled",
            ExchangeOutcome::Failed { .. } => "failed",
        }
    }
}
