//! Batch dispatcher: sends one same-kind batch and correlates replies by position.

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::request::{Request, RequestBody, RequestPackage};
use crate::response::Response;
use crate::result::QueryResult;
use crate::tokens::TokenBudget;
use crate::transport::Transport;
use crate::types::RequestKind;
use crate::{Error, Result};

/// Per-item outcome of a batch whose transmission succeeded.
#[derive(Debug)]
pub struct BatchReport {
    /// Log correlation only; never sent on the wire.
    pub batch_id: Uuid,
    pub kind: Option<RequestKind>,
    /// Positions whose result slot was filled.
    pub delivered: Vec<usize>,
    /// Positions skipped because their reply node could not be used.
    pub skipped: Vec<(usize, Error)>,
    pub execution_time: Duration,
    pub total: usize,
}

impl BatchReport {
    fn new(batch_id: Uuid, kind: Option<RequestKind>, total: usize) -> Self {
        Self {
            batch_id,
            kind,
            delivered: Vec::new(),
            skipped: Vec::new(),
            execution_time: Duration::ZERO,
            total,
        }
    }

    pub fn all_delivered(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Serializes a batch, charges the token budget, sends it, and hands each
/// decoded reply back to the request at the same index.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    budget: Arc<TokenBudget>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, budget: Arc<TokenBudget>) -> Self {
        Self { transport, budget }
    }

    pub fn budget(&self) -> &Arc<TokenBudget> {
        &self.budget
    }

    /// One round trip for `bodies`.
    ///
    /// `Err` means the whole transmission failed: not enough tokens, an HTTP
    /// error status, an unreadable body, or a reply count that differs from the
    /// request count. Otherwise element `i` is the outcome for `bodies[i]`.
    pub async fn exchange(&self, bodies: &[&RequestBody]) -> Result<Vec<Result<QueryResult>>> {
        self.exchange_with_id(Uuid::new_v4(), bodies).await
    }

    async fn exchange_with_id(
        &self,
        batch_id: Uuid,
        bodies: &[&RequestBody],
    ) -> Result<Vec<Result<QueryResult>>> {
        if bodies.is_empty() {
            return Ok(Vec::new());
        }
        let count = bodies.len();
        let payload = RequestPackage::new(bodies.iter().copied()).to_bytes()?;

        // Tokens are charged before the send and never refunded.
        if let Err(e) = self.budget.try_charge(count as u64) {
            warn!(%batch_id, size = count, error = %e, "not enough API tokens remain");
            return Err(e);
        }
        debug!(
            %batch_id,
            size = count,
            tokens_remaining = self.budget.remaining(),
            "sending API requests"
        );

        let reply = self.transport.send(payload).await?;
        if !reply.is_success() {
            if reply.status == 429 {
                self.budget.set_remaining(0);
            }
            let err = Error::from_status(reply.status, reply.reason);
            warn!(%batch_id, status = reply.status, error = %err, "API request failed");
            return Err(err);
        }

        let nodes: Vec<Value> = serde_json::from_slice(&reply.body)?;
        if nodes.len() != count {
            let err = Error::OrderingMismatch {
                expected: count,
                received: nodes.len(),
            };
            warn!(%batch_id, error = %err, "responses do not align with requests");
            return Err(err);
        }

        Ok(nodes
            .iter()
            .zip(bodies)
            .enumerate()
            .map(|(i, (node, origin))| {
                Response::decode(i, node)?
                    .into_result(origin)
                    .map_err(|e| e.at(i))
            })
            .collect())
    }

    /// Send a drained batch and fill each request's result slot.
    ///
    /// A batch-level error leaves every slot empty; those callers time out.
    /// Requests are not requeued.
    pub async fn dispatch(&self, batch: Vec<Request>) -> Result<BatchReport> {
        let start = Instant::now();
        let batch_id = Uuid::new_v4();
        let kind = batch.first().map(Request::kind);
        let mut report = BatchReport::new(batch_id, kind, batch.len());

        let bodies: Vec<&RequestBody> = batch.iter().map(Request::body).collect();
        let outcomes = match self.exchange_with_id(batch_id, &bodies).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                warn!(
                    %batch_id,
                    lost = batch.len(),
                    error = %e,
                    "batch aborted, requests will not receive results"
                );
                return Err(e);
            }
        };

        for (i, (request, outcome)) in batch.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(result) => {
                    request.deliver(result);
                    report.delivered.push(i);
                }
                Err(e) => {
                    warn!(%batch_id, index = i, request = %request.body(), error = %e, "skipping reply node");
                    report.skipped.push((i, e));
                }
            }
        }

        report.execution_time = start.elapsed();
        debug!(
            %batch_id,
            delivered = report.delivered_count(),
            skipped = report.skipped_count(),
            elapsed_ms = report.execution_time.as_millis() as u64,
            "batch complete"
        );
        Ok(report)
    }
}
