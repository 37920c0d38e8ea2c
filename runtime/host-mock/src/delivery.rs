//! Deferred completion delivery
//!
//! The mock host completes asynchronous operations on its own schedule, like a
//! cooperative single-threaded runtime: one delivery thread, jobs ordered by
//! due time, callbacks never run concurrently with each other.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Instant;

use crossbeam::channel::{Receiver, RecvTimeoutError};
use host_platform::{CallbackId, HostValue};

use crate::Shared;

/// What to do with a callback registration when a job comes due
#[derive(Debug)]
pub(crate) enum Action {
    /// Invoke the callback `times` times with `args`
    Fire { args: Vec<HostValue>, times: usize },
    /// Unregister without invoking
    Drop,
}

#[derive(Debug)]
pub(crate) struct Job {
    pub due: Instant,
    pub seq: u64,
    pub callback: CallbackId,
    pub action: Action,
}

// Min-heap on (due, seq): earliest first, FIFO among equal deadlines.
impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Job {}

pub(crate) fn delivery_loop(shared: Arc<Shared>, rx: Receiver<Job>) {
    let mut queue: BinaryHeap<Job> = BinaryHeap::new();

    loop {
        let received = match queue.peek() {
            Some(next) => rx.recv_deadline(next.due),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(job) => queue.push(job),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        while queue.peek().is_some_and(|job| job.due <= now) {
            if let Some(job) = queue.pop() {
                shared.run(job.callback, job.action);
            }
        }
    }

    log::trace!("mock delivery loop stopped with {} job(s) pending", queue.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn job(due: Instant, seq: u64) -> Job {
        Job {
            due,
            seq,
            callback: CallbackId::new(seq),
            action: Action::Drop,
        }
    }

    #[test]
    fn test_heap_orders_by_due_then_seq() {
        let now = Instant::now();
        let mut heap = BinaryHeap::new();
        heap.push(job(now + Duration::from_millis(20), 1));
        heap.push(job(now, 3));
        heap.push(job(now, 2));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|j| j.seq)).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
