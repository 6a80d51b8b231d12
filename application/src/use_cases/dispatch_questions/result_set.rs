//! Shared answer accumulator.

use botbatch_domain::Answer;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Answers collected by the workers, appended under a single lock.
///
/// Order follows completion, not input position.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    inner: Arc<Mutex<Vec<Answer>>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, answer: Answer) {
        self.inner.lock().await.push(answer);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Move every collected answer out, leaving the set empty.
    pub async fn take(&self) -> Vec<Answer> {
        std::mem::take(&mut *self.inner.lock().await)
    }
}
