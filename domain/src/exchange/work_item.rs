//! Items carried by the dispatch queue.

/// A queue entry: real work, or the stop sentinel.
///
/// The dispatcher enqueues exactly one `Stop` per worker, and only after
/// every `Job` has been acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem<T> {
    Job(T),
    Stop,
}

impl<T> WorkItem<T> {
    pub fn is_stop(&self) -> bool {
        matches!(self, WorkItem::Stop)
    }

    pub fn into_job(self) -> Option<T> {
        match self {
            WorkItem::Job(job) => Some(job),
            WorkItem::Stop => None,
        }
    }
}
