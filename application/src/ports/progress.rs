//! Progress notification port
//!
//! Defines the interface for reporting progress while a batch runs.

use crate::metrics::MetricsSnapshot;
use botbatch_domain::{ExchangeOutcome, Question};

/// Callback for progress updates during batch execution
///
/// Implementations live in the presentation layer. Called concurrently
/// from every worker.
pub trait BatchProgressNotifier: Send + Sync {
    /// Called once before any worker starts
    fn on_batch_start(&self, total: usize);

    /// Called when a worker picks up a question
    fn on_exchange_start(&self, _question: &Question) {}

    /// Called when a question resolves, whatever the outcome
    fn on_exchange_complete(&self, question: &Question, outcome: &ExchangeOutcome);

    /// Called after every worker has stopped
    fn on_batch_complete(&self, metrics: &MetricsSnapshot);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BatchProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total: usize) {}
    fn on_exchange_complete(&self, _question: &Question, _outcome: &ExchangeOutcome) {}
    fn on_batch_complete(&self, _metrics: &MetricsSnapshot) {}
}
