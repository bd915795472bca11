//! Shared test transports.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use volland_rs::transport::{Transport, TransportReply};
use volland_rs::Result;

/// Replays canned replies in order and records every package it receives.
///
/// Once the script runs out, every send gets a 500.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<TransportReply>>,
    sent: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<TransportReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(vec![reply(status, body)])
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, body: Bytes) -> Result<TransportReply> {
        self.sent.lock().unwrap().push(serde_json::from_slice(&body)?);
        let next = self.replies.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| TransportReply::new(500, "")))
    }
}

/// Builds a reply node for each request in the package, like the live service.
pub struct EchoTransport {
    sent: Mutex<Vec<Value>>,
}

impl EchoTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Size of every package received so far, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|p| p["requests"].as_array().map_or(0, Vec::len))
            .collect()
    }
}

#[async_trait]
impl Transport for EchoTransport {
    async fn send(&self, body: Bytes) -> Result<TransportReply> {
        let package: Value = serde_json::from_slice(&body)?;
        let nodes: Vec<Value> = package["requests"]
            .as_array()
            .map(|reqs| reqs.iter().map(echo_node).collect())
            .unwrap_or_default();
        self.sent.lock().unwrap().push(package);
        Ok(TransportReply::new(200, serde_json::to_vec(&nodes)?))
    }
}

/// Echoes like [`EchoTransport`] but holds packages of one request type.
pub struct SlowKindTransport {
    slow_type: &'static str,
    delay: Duration,
    echo: EchoTransport,
}

impl SlowKindTransport {
    pub fn new(slow_type: &'static str, delay: Duration) -> Self {
        Self {
            slow_type,
            delay,
            echo: EchoTransport::new(),
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.echo.batch_sizes()
    }
}

#[async_trait]
impl Transport for SlowKindTransport {
    async fn send(&self, body: Bytes) -> Result<TransportReply> {
        let package: Value = serde_json::from_slice(&body)?;
        if package["requests"][0]["request_type"] == self.slow_type {
            tokio::time::sleep(self.delay).await;
        }
        self.echo.send(body).await
    }
}

/// A plausible reply for one request node.
pub fn echo_node(request: &Value) -> Value {
    let ticker = request["ticker"].clone();
    match request["request_type"].as_str() {
        Some("exposure_request") => json!({
            "request_type": "exposure_request",
            "ticker": ticker,
            "greek": request["greek"],
            "kind": request["kind"],
            "expirations": request["expirations"],
            "data": {
                "strikes": ["100", "105"],
                "exposures": [1.5, -2.0],
                "currentPrice": 150.0,
                "lastModified": "2024-06-21 15:59:00"
            }
        }),
        Some("trend_request") => json!({
            "request_type": "trend_request",
            "ticker": ticker,
            "greek": request["greek"],
            "data": {
                "trend": [
                    {"x": "2024-06-20", "y": 1.25},
                    {"x": "2024-06-21", "y": -0.5}
                ],
                "lastModified": "2024-06-21 15:59:00"
            }
        }),
        Some("paradigm_request") => json!({
            "request_type": "paradigm_request",
            "ticker": ticker,
            "data": {
                "paradigm": "GEX-TARGET",
                "target": 5400.0,
                "lis": [5350.0, 5375.0],
                "lastModified": "2024-06-21 15:59:00"
            }
        }),
        _ => json!({
            "request_type": "zerodte_request",
            "ticker": ticker,
            "data": {
                "dealer_premium": -1250000.0,
                "option_volume": 420000,
                "zerodte_agg_charm": -35
            }
        }),
    }
}

pub fn reply(status: u16, body: Value) -> TransportReply {
    TransportReply::new(status, body.to_string())
}
