use crate::tokens::TokenBudgetSnapshot;
use crate::types::RequestKind;

/// A lightweight snapshot of runtime "signals" for orchestration.
///
/// Facts only: callers decide what to do when tokens run low or the queue grows.
#[derive(Debug, Clone, Default)]
pub struct SignalsSnapshot {
    pub tokens: TokenBudgetSnapshot,
    pub queue: QueueSnapshot,
}

/// Pending requests not yet drained into a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub total: usize,
    pub by_kind: Vec<(RequestKind, usize)>,
}

impl QueueSnapshot {
    pub fn pending(&self, kind: RequestKind) -> usize {
        self.by_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
