use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::batch::{BatchScheduler, Dispatcher, PendingQueue, ResultSlot};
use crate::client::builder::VollandClientBuilder;
use crate::client::signals::{QueueSnapshot, SignalsSnapshot};
use crate::config::ClientConfig;
use crate::request::{
    ExposureRequest, ParadigmRequest, Request, RequestBody, TrendRequest, ZeroDteRequest,
};
use crate::result::{ExposureResult, ParadigmResult, QueryResult, TrendResult, ZeroDteResult};
use crate::tokens::TokenBudget;
use crate::types::{Greek, OptionKind, RequestKind};
use crate::{tickers, Error, ErrorContext, Result};

/// Client for the Volland API.
///
/// Every request goes through the pending queue and is sent in a same-kind
/// batch on the next scheduler tick. Callers wait up to
/// [`ClientConfig::result_timeout`] for their result; `Ok(None)` means nothing
/// arrived in time, which covers every batch-level failure (transport error,
/// token shortage, count mismatch) as well as a skipped reply node.
///
/// Dropping the client stops the scheduler. Requests still queued at that
/// point are never sent.
pub struct VollandClient {
    pub(crate) config: ClientConfig,
    pub(crate) queue: Arc<PendingQueue>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) scheduler: BatchScheduler,
}

impl VollandClient {
    pub fn builder() -> VollandClientBuilder {
        VollandClientBuilder::new()
    }

    /// Client with defaults, env overrides, and a key from the keyring or
    /// `VOLLAND_API_KEY`.
    pub async fn new(tokens_remaining: i64) -> Result<Self> {
        VollandClientBuilder::new()
            .tokens_remaining(tokens_remaining)
            .build()
            .await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn check_ticker(&self, body: &RequestBody) -> Result<()> {
        if self.config.strict_tickers && !tickers::is_supported(body.ticker()) {
            return Err(Error::validation_with_context(
                format!("unsupported ticker {}", body.ticker()),
                ErrorContext::new()
                    .with_field_path("request.ticker")
                    .with_source("client"),
            ));
        }
        Ok(())
    }

    /// Queue a request without waiting. The returned slot is filled once its
    /// batch completes.
    pub fn enqueue(&self, body: impl Into<RequestBody>) -> Result<Arc<ResultSlot<QueryResult>>> {
        let body = body.into();
        self.check_ticker(&body)?;
        let request = Request::new(body);
        let slot = request.slot();
        let depth = self.queue.enqueue(request);
        debug!(pending = depth, "request queued");
        Ok(slot)
    }

    /// Queue a request and wait for its result.
    pub async fn submit(&self, body: impl Into<RequestBody>) -> Result<Option<QueryResult>> {
        let slot = self.enqueue(body)?;
        Ok(slot.wait(self.config.result_timeout).await)
    }

    pub async fn submit_exposure(&self, request: ExposureRequest) -> Result<Option<ExposureResult>> {
        Ok(self.submit(request).await?.and_then(QueryResult::into_exposure))
    }

    pub async fn submit_trend(&self, request: TrendRequest) -> Result<Option<TrendResult>> {
        Ok(self.submit(request).await?.and_then(QueryResult::into_trend))
    }

    pub async fn submit_paradigm(&self, request: ParadigmRequest) -> Result<Option<ParadigmResult>> {
        Ok(self.submit(request).await?.and_then(QueryResult::into_paradigm))
    }

    pub async fn submit_zero_dte(&self, request: ZeroDteRequest) -> Result<Option<ZeroDteResult>> {
        Ok(self.submit(request).await?.and_then(QueryResult::into_zero_dte))
    }

    /// Exposure by strike. `None` or an empty list requests all expirations.
    pub async fn request_exposure(
        &self,
        ticker: &str,
        kind: OptionKind,
        greek: Greek,
        expirations: Option<Vec<NaiveDate>>,
    ) -> Result<Option<ExposureResult>> {
        self.submit_exposure(ExposureRequest::new(ticker, kind, greek, expirations)?)
            .await
    }

    /// Exposure by strike for a single expiration.
    pub async fn request_exposure_for(
        &self,
        ticker: &str,
        kind: OptionKind,
        greek: Greek,
        expiration: NaiveDate,
    ) -> Result<Option<ExposureResult>> {
        self.submit_exposure(ExposureRequest::for_expiration(ticker, kind, greek, expiration)?)
            .await
    }

    pub async fn request_trend(&self, ticker: &str, greek: Greek) -> Result<Option<TrendResult>> {
        self.submit_trend(TrendRequest::new(ticker, greek)?).await
    }

    pub async fn request_paradigm(&self, ticker: &str) -> Result<Option<ParadigmResult>> {
        self.submit_paradigm(ParadigmRequest::new(ticker)?).await
    }

    pub async fn request_zero_dte(&self, ticker: &str) -> Result<Option<ZeroDteResult>> {
        self.submit_zero_dte(ZeroDteRequest::new(ticker)?).await
    }

    /// Send `bodies` as one transmission right away, bypassing the queue.
    ///
    /// Unlike the batched path, batch-level failures come back as `Err`.
    /// Kinds may be mixed; element `i` of the result answers `bodies[i]`.
    pub async fn query_direct(&self, bodies: Vec<RequestBody>) -> Result<Vec<Result<QueryResult>>> {
        for body in &bodies {
            self.check_ticker(body)?;
        }
        let refs: Vec<&RequestBody> = bodies.iter().collect();
        self.dispatcher.exchange(&refs).await
    }

    pub fn tokens_remaining(&self) -> u64 {
        self.dispatcher.budget().remaining()
    }

    /// Reset the budget, e.g. after reading the account's balance elsewhere.
    /// Negative values clamp to zero.
    pub fn update_tokens_remaining(&self, n: i64) {
        self.dispatcher.budget().set_remaining(n);
        info!(tokens_remaining = self.tokens_remaining(), "token budget updated");
    }

    pub fn token_budget(&self) -> Arc<TokenBudget> {
        Arc::clone(self.dispatcher.budget())
    }

    /// Requests queued and not yet drained into a batch.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Snapshot current runtime signals (facts only) for application-layer orchestration.
    pub fn signals(&self) -> SignalsSnapshot {
        let by_kind: Vec<(RequestKind, usize)> = RequestKind::ALL
            .iter()
            .map(|kind| (*kind, self.queue.len_of(*kind)))
            .collect();
        SignalsSnapshot {
            tokens: self.dispatcher.budget().snapshot(),
            queue: QueueSnapshot {
                total: by_kind.iter().map(|(_, n)| n).sum(),
                by_kind,
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Stop the scheduler. Batches already in flight still complete; queued
    /// requests are dropped and their callers time out.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
        let dropped = self.queue.clear();
        info!(dropped, "volland client shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Transport, TransportReply};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::time::Duration;

    /// Answers every paradigm batch with one node per request.
    struct EchoParadigm;

    #[async_trait]
    impl Transport for EchoParadigm {
        async fn send(&self, body: Bytes) -> Result<TransportReply> {
            let package: serde_json::Value = serde_json::from_slice(&body)?;
            let nodes: Vec<serde_json::Value> = package["requests"]
                .as_array()
                .map(|reqs| {
                    reqs.iter()
                        .map(|r| {
                            serde_json::json!({
                                "request_type": "paradigm_request",
                                "ticker": r["ticker"],
                                "data": {
                                    "paradigm": "GEX-PURE",
                                    "target": 5000.0,
                                    "lis": 4950.0,
                                    "lastModified": "2024-06-21 15:59:00"
                                }
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Ok(TransportReply::new(200, serde_json::to_vec(&nodes)?))
        }
    }

    async fn client(strict: bool) -> VollandClient {
        VollandClient::builder()
            .transport(Arc::new(EchoParadigm))
            .tokens_remaining(10)
            .requests_per_second(10)
            .result_timeout(Duration::from_secs(2))
            .strict_tickers(strict)
            .build()
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_paradigm_round_trip() {
        let client = client(false).await;
        let result = client.request_paradigm("spy").await.unwrap().unwrap();
        assert_eq!(result.ticker, "SPY");
        assert_eq!(result.lis, Some(vec![4950.0]));
        assert_eq!(client.tokens_remaining(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_kind_accessor_is_none() {
        let client = client(false).await;
        // A paradigm reply to a zero-DTE request is skipped, so the caller times out.
        assert!(client.request_zero_dte("SPX").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_strict_tickers_rejects_before_enqueue() {
        let client = client(true).await;
        let err = client.request_paradigm("NOTATICKER").await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(client.pending(), 0);
    }

    #[tokio::test]
    async fn test_signals_reports_queue_depth() {
        let client = client(false).await;
        client.shutdown();
        client.enqueue(ParadigmRequest::new("SPY").unwrap()).unwrap();
        client.enqueue(ParadigmRequest::new("QQQ").unwrap()).unwrap();
        let signals = client.signals();
        assert_eq!(signals.queue.total, 2);
        assert_eq!(signals.queue.pending(RequestKind::Paradigm), 2);
        assert_eq!(signals.tokens.remaining, 10);
    }

    #[tokio::test]
    async fn test_query_direct_propagates_items() {
        let client = client(false).await;
        let outcomes = client
            .query_direct(vec![
                ParadigmRequest::new("SPY").unwrap().into(),
                ParadigmRequest::new("QQQ").unwrap().into(),
            ])
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[1].as_ref().unwrap().ticker(), "QQQ");
        assert_eq!(client.tokens_remaining(), 8);
    }
}
