//! Pending queue.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::request::Request;
use crate::types::RequestKind;

/// Requests accepted but not yet sent.
///
/// Unbounded: nothing pushes back on producers that outpace the scheduler.
/// Watch [`PendingQueue::len`] (or the client's signals) to spot a backlog.
#[derive(Debug, Default)]
pub struct PendingQueue {
    items: Mutex<VecDeque<Request>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Request>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, request: Request) -> usize {
        let mut items = self.lock();
        items.push_back(request);
        items.len()
    }

    /// Remove and return up to `max` requests of `kind`, oldest first.
    /// Requests of other kinds keep their relative order.
    pub fn drain(&self, kind: RequestKind, max: usize) -> Vec<Request> {
        let mut items = self.lock();
        if max == 0 || items.is_empty() {
            return Vec::new();
        }
        let mut taken = Vec::new();
        let mut kept = VecDeque::with_capacity(items.len());
        for request in items.drain(..) {
            if taken.len() < max && request.kind() == kind {
                taken.push(request);
            } else {
                kept.push_back(request);
            }
        }
        *items = kept;
        taken
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn len_of(&self, kind: RequestKind) -> usize {
        self.lock().iter().filter(|r| r.kind() == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pending request; their callers time out.
    pub fn clear(&self) -> usize {
        let mut items = self.lock();
        let n = items.len();
        items.clear();
        n
    }
}
