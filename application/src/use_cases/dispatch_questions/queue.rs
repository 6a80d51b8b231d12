//! FIFO work queue with acknowledgement tracking.
//!
//! Multi-consumer: any number of workers may `get` concurrently. Every item
//! that is `put` counts as unfinished until a matching `task_done`, and
//! `join` waits for that count to reach zero.

use botbatch_domain::WorkItem;
use tokio::sync::{Mutex, mpsc, watch};

pub struct WorkQueue<T> {
    tx: mpsc::UnboundedSender<WorkItem<T>>,
    rx: Mutex<mpsc::UnboundedReceiver<WorkItem<T>>>,
    unfinished: watch::Sender<usize>,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (unfinished, _) = watch::channel(0);
        Self {
            tx,
            rx: Mutex::new(rx),
            unfinished,
        }
    }

    pub fn put(&self, item: WorkItem<T>) {
        self.unfinished.send_modify(|n| *n += 1);
        // The queue owns its receiver, so the channel cannot be closed here.
        let _ = self.tx.send(item);
    }

    /// Next item in FIFO order. Waits while the queue is empty.
    pub async fn get(&self) -> Option<WorkItem<T>> {
        self.rx.lock().await.recv().await
    }

    /// Acknowledge one item previously returned by [`get`](Self::get).
    pub fn task_done(&self) {
        self.unfinished.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Wait until every item put so far has been acknowledged.
    pub async fn join(&self) {
        let mut rx = self.unfinished.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    pub fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Acknowledges the item it was created for when dropped, so a worker acks
/// on every path out of an iteration, unwinding included.
pub struct TaskDone<'a, T> {
    queue: &'a WorkQueue<T>,
}

impl<'a, T> TaskDone<'a, T> {
    pub fn new(queue: &'a WorkQueue<T>) -> Self {
        Self { queue }
    }
}

impl<T> Drop for TaskDone<'_, T> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}
