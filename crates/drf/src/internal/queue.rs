use crate::ApplicationId;
use chrono::{DateTime, Utc};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Ordering key of a queued application: submission time, then arrival order.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueueKey {
    pub submission_time: DateTime<Utc>,
    pub arrival: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedApp {
    pub id: ApplicationId,
    pub key: QueueKey,
}

/// Pending applications of a single user, oldest submission first.
#[derive(Default, Debug)]
pub struct ApplicationQueue {
    queue: PriorityQueue<ApplicationId, Reverse<QueueKey>>,
    arrivals: u64,
}

impl ApplicationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the application is already queued; the queue is left unchanged.
    pub fn push(&mut self, app_id: ApplicationId, submission_time: DateTime<Utc>) -> bool {
        if self.queue.get(&app_id).is_some() {
            return false;
        }
        let key = QueueKey {
            submission_time,
            arrival: self.arrivals,
        };
        self.arrivals += 1;
        self.queue.push(app_id, Reverse(key));
        true
    }

    /// Re-inserts an entry that was taken out by [`ApplicationQueue::pop_for_removal`],
    /// keeping its original position.
    pub fn restore(&mut self, app: QueuedApp) {
        self.queue.push(app.id, Reverse(app.key));
    }

    /// Selects the head of the queue without removing it.
    ///
    /// The head is popped and pushed back with the same key, so it stays the head
    /// until it is purged.
    pub fn peek_and_rotate(&mut self) -> Option<ApplicationId> {
        let (app_id, key) = self.queue.pop()?;
        self.queue.push(app_id.clone(), key);
        Some(app_id)
    }

    /// Physically removes the head of the queue.
    pub fn pop_for_removal(&mut self) -> Option<QueuedApp> {
        self.queue
            .pop()
            .map(|(id, Reverse(key))| QueuedApp { id, key })
    }

    #[inline]
    pub fn contains(&self, app_id: &ApplicationId) -> bool {
        self.queue.get(app_id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
