//! Single-assignment result slot.

use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Write-once cell a caller waits on for its result.
///
/// The first [`set`](ResultSlot::set) wins; later writes are ignored. A write
/// that lands after the caller stopped waiting is harmless.
#[derive(Debug)]
pub struct ResultSlot<T> {
    value: OnceLock<T>,
    notify: Notify,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self {
            value: OnceLock::new(),
            notify: Notify::new(),
        }
    }
}

impl<T: Clone> ResultSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the slot was already filled.
    pub fn set(&self, value: T) -> bool {
        if self.value.set(value).is_err() {
            tracing::debug!("result slot already filled, ignoring late write");
            return false;
        }
        self.notify.notify_waiters();
        true
    }

    pub fn is_set(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn get(&self) -> Option<T> {
        self.value.get().cloned()
    }

    /// Wait up to `timeout` for a value. Wakes as soon as it is set.
    ///
    /// A timeout too large to express as a deadline waits without one.
    pub async fn wait(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a set() between check and await isn't missed.
            notified.as_mut().enable();

            if let Some(v) = self.value.get() {
                return Some(v.clone());
            }
            match deadline {
                Some(deadline) => {
                    if tokio::time::timeout_at(deadline, notified).await.is_err() {
                        return self.get();
                    }
                }
                None => notified.await,
            }
        }
    }
}
