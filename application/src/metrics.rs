//! Run metrics accumulator.
//!
//! [`RunMetrics`] is shared by handle (`Arc<RunMetrics>`) with every
//! worker; there is no process-wide counter state.

use botbatch_domain::{ExchangeOutcome, Stage};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free counters updated by workers as exchanges resolve.
#[derive(Debug, Default)]
pub struct RunMetrics {
    answered: AtomicUsize,
    timed_out: AtomicUsize,
    closed: AtomicUsize,
    cancelled: AtomicUsize,
    failed_token: AtomicUsize,
    failed_conversation: AtomicUsize,
    failed_connect: AtomicUsize,
    failed_send: AtomicUsize,
    failed_listen: AtomicUsize,
    failed_worker: AtomicUsize,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: &ExchangeOutcome) {
        let counter = match outcome {
            ExchangeOutcome::Answered(_) => &self.answered,
            ExchangeOutcome::TimedOut => &self.timed_out,
            ExchangeOutcome::Closed => &self.closed,
            ExchangeOutcome::Cancelled => &self.cancelled,
            ExchangeOutcome::Failed { stage, .. } => self.failure_counter(*stage),
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn failure_counter(&self, stage: Stage) -> &AtomicUsize {
        match stage {
            Stage::Token => &self.failed_token,
            Stage::Conversation => &self.failed_conversation,
            Stage::Connect => &self.failed_connect,
            Stage::Send => &self.failed_send,
            Stage::Listen => &self.failed_listen,
            Stage::Worker => &self.failed_worker,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicUsize| c.load(Ordering::Relaxed);
        MetricsSnapshot {
            answered: load(&self.answered),
            timed_out: load(&self.timed_out),
            closed: load(&self.closed),
            cancelled: load(&self.cancelled),
            failed: FailureCounts {
                token: load(&self.failed_token),
                conversation: load(&self.failed_conversation),
                connect: load(&self.failed_connect),
                send: load(&self.failed_send),
                listen: load(&self.failed_listen),
                worker: load(&self.failed_worker),
            },
        }
    }
}

/// Failures broken down by stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    pub token: usize,
    pub conversation: usize,
    pub connect: usize,
    pub send: usize,
    pub listen: usize,
    pub worker: usize,
}

impl FailureCounts {
    pub fn total(&self) -> usize {
        self.token + self.conversation + self.connect + self.send + self.listen + self.worker
    }
}

/// Point-in-time copy of [`RunMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub answered: usize,
    pub timed_out: usize,
    pub closed: usize,
    pub cancelled: usize,
    pub failed: FailureCounts,
}

impl MetricsSnapshot {
    /// Exchanges that resolved one way or another
    pub fn processed(&self) -> usize {
        self.answered + self.lost()
    }

    /// Exchanges that produced no answer
    pub fn lost(&self) -> usize {
        self.timed_out + self.closed + self.cancelled + self.failed.total()
    }
}
