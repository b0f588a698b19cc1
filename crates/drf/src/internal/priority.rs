use crate::UserId;
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};

/// Dominant share with a total order, so it can be used as a queue priority.
#[derive(Debug, Copy, Clone)]
pub struct Share(f64);

impl Share {
    #[inline]
    pub fn new(value: f64) -> Self {
        Share(value)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Share {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Share {}

impl PartialOrd for Share {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Share {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Users ordered by dominant share, the smallest share first.
///
/// Equal shares are ordered by enrollment (the user enrolled first wins).
#[derive(Default, Debug)]
pub struct UserPriorityIndex {
    queue: PriorityQueue<UserId, Reverse<(Share, u64)>>,
}

impl UserPriorityIndex {
    /// Replaces the whole content of the index with freshly scored users.
    pub fn rebuild(&mut self, scores: impl IntoIterator<Item = (UserId, f64, u64)>) {
        self.queue.clear();
        for (user, share, enrollment) in scores {
            self.queue.push(user, Reverse((Share::new(share), enrollment)));
        }
    }

    pub fn pop_min(&mut self) -> Option<(UserId, f64)> {
        self.queue
            .pop()
            .map(|(user, Reverse((share, _)))| (user, share.value()))
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
