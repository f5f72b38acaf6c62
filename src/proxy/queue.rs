//! Work queue shared by the checker's workers

use crate::proxy::models::Candidate;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Pre-populated queue of candidates that only ever shrinks.
///
/// Every candidate is handed to exactly one caller of [`WorkQueue::claim`].
/// Once it is empty it stays empty, so `None` tells a worker to stop.
#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: Mutex<VecDeque<Candidate>>,
}

impl WorkQueue {
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        Self {
            pending: Mutex::new(candidates.into_iter().collect()),
        }
    }

    /// Take the next unclaimed candidate, or `None` once the queue is drained
    pub fn claim(&self) -> Option<Candidate> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Number of candidates not yet claimed
    pub fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
