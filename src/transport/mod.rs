//! 传输层模块：将序列化后的请求包发送到远程服务。
//!
//! # Transport Module
//!
//! The dispatcher treats the network as a black box: hand it a serialized
//! request package, get back an HTTP status and a body. [`HttpTransport`] is the
//! production implementation; tests plug in their own [`Transport`].

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;

use crate::Result;

/// Raw reply from one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub reason: Option<String>,
    pub body: Bytes,
}

impl TransportReply {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `send(bytes) -> (status, bytes)`.
///
/// Implementations only fail for connection-level problems; any HTTP status,
/// including errors, comes back as a [`TransportReply`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: Bytes) -> Result<TransportReply>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
