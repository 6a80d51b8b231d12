//! Dispatch parameters: worker pool and deadline control.
//!
//! [`DispatchParams`] groups the static parameters that control
//! [`DispatchQuestionsUseCase`](crate::use_cases::dispatch_questions::DispatchQuestionsUseCase)
//! and the [`AnswerListener`](crate::use_cases::listen_for_answer::AnswerListener)
//! each worker runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 20;
/// Default per-question deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Upper bound on a single receive attempt, so the deadline is re-checked at >= 1 Hz.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchParamsError {
    #[error("workers must be at least 1")]
    NoWorkers,

    #[error("timeout cannot be zero")]
    ZeroTimeout,

    #[error("poll interval cannot be zero")]
    ZeroPollInterval,
}

/// Worker pool control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Number of concurrent workers (the only throttle on open conversations).
    pub workers: usize,
    /// Wall-clock deadline for each question.
    pub timeout: Duration,
    /// Cap on a single receive attempt inside the listener.
    pub poll_interval: Duration,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn validate(&self) -> Result<(), DispatchParamsError> {
        if self.workers == 0 {
            return Err(DispatchParamsError::NoWorkers);
        }
        if self.timeout.is_zero() {
            return Err(DispatchParamsError::ZeroTimeout);
        }
        if self.poll_interval.is_zero() {
            return Err(DispatchParamsError::ZeroPollInterval);
        }
        Ok(())
    }
}
