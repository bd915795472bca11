//! Periodic batch scheduler.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::dispatcher::{BatchReport, Dispatcher};
use super::queue::PendingQueue;
use crate::types::RequestKind;
use crate::Result;

/// Drains the pending queue once per tick and sends one batch per kind.
///
/// Batch sends are detached tasks, so a slow batch of one kind never delays
/// another kind or the next tick. Dropping the scheduler stops the ticking;
/// batches already in flight still complete.
pub struct BatchScheduler {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    period: Duration,
}

impl BatchScheduler {
    /// Start ticking every `period`. Must be called inside a tokio runtime.
    pub fn spawn(
        queue: Arc<PendingQueue>,
        dispatcher: Arc<Dispatcher>,
        period: Duration,
        max_per_transmission: usize,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        Self::tick(&queue, &dispatcher, max_per_transmission);
                    }
                }
            }
            debug!("batch scheduler stopped");
        });
        info!(period_ms = period.as_millis() as u64, max_per_transmission, "batch scheduler started");
        Self {
            cancel,
            handle,
            period,
        }
    }

    /// One scheduler pass: for every kind with pending work, drain up to
    /// `max_per_transmission` requests and spawn their send.
    ///
    /// Returns the spawned sends; the scheduler itself never awaits them.
    pub fn tick(
        queue: &Arc<PendingQueue>,
        dispatcher: &Arc<Dispatcher>,
        max_per_transmission: usize,
    ) -> Vec<JoinHandle<Result<BatchReport>>> {
        if queue.is_empty() {
            return Vec::new();
        }
        let mut sends = Vec::new();
        for kind in RequestKind::ALL {
            let batch = queue.drain(kind, max_per_transmission);
            if batch.is_empty() {
                continue;
            }
            debug!(%kind, size = batch.len(), "dispatching batch");
            let dispatcher = Arc::clone(dispatcher);
            sends.push(tokio::spawn(async move { dispatcher.dispatch(batch).await }));
        }
        sends
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for BatchScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ParadigmRequest, Request, TrendRequest};
    use crate::tokens::TokenBudget;
    use crate::transport::{Transport, TransportReply};
    use crate::types::Greek;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts sends and always answers with a 500.
    struct Failing {
        sends: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Failing {
        async fn send(&self, _body: Bytes) -> Result<TransportReply> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(TransportReply::new(500, ""))
        }
    }

    fn setup() -> (Arc<PendingQueue>, Arc<Dispatcher>, Arc<Failing>) {
        let transport = Arc::new(Failing {
            sends: AtomicUsize::new(0),
        });
        let dispatcher = Arc::new(Dispatcher::new(
            transport.clone(),
            Arc::new(TokenBudget::new(1000)),
        ));
        (Arc::new(PendingQueue::new()), dispatcher, transport)
    }

    #[tokio::test]
    async fn test_tick_one_batch_per_kind() {
        let (queue, dispatcher, transport) = setup();
        for t in ["A", "B", "C"] {
            queue.enqueue(Request::new(TrendRequest::new(t, Greek::Delta).unwrap()));
        }
        queue.enqueue(Request::new(ParadigmRequest::new("SPX").unwrap()));

        let sends = BatchScheduler::tick(&queue, &dispatcher, 2);
        assert_eq!(sends.len(), 2);
        for s in sends {
            assert!(s.await.unwrap().is_err());
        }
        assert_eq!(transport.sends.load(Ordering::SeqCst), 2);
        // One trend request is left for the next tick.
        assert_eq!(queue.len_of(RequestKind::Trend), 1);
    }

    #[tokio::test]
    async fn test_tick_on_empty_queue() {
        let (queue, dispatcher, transport) = setup();
        assert!(BatchScheduler::tick(&queue, &dispatcher, 20).is_empty());
        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_drains_on_period() {
        let (queue, dispatcher, transport) = setup();
        let scheduler = BatchScheduler::spawn(
            queue.clone(),
            dispatcher,
            Duration::from_millis(500),
            1,
        );
        assert!(scheduler.is_running());

        for t in ["A", "B", "C"] {
            queue.enqueue(Request::new(TrendRequest::new(t, Greek::Vega).unwrap()));
        }
        // Immediate first tick plus two more periods drains one request each.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(queue.is_empty());
        assert_eq!(transport.sends.load(Ordering::SeqCst), 3);

        scheduler.shutdown();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!scheduler.is_running());
    }
}
