use async_trait::async_trait;
use bytes::Bytes;
use keyring::Entry;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::env;
use std::time::Duration;

use super::{Transport, TransportError, TransportReply};
use crate::{Error, ErrorContext, Result};

const API_KEY_HEADER: &str = "x-api-key";
const KEYRING_SERVICE: &str = "volland";
const KEYRING_USER: &str = "api-key";

/// POSTs request packages to the service with the `X-API-KEY` header.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(|_| {
            Error::configuration_with_context(
                "API key contains characters not allowed in a header",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("http_transport"),
            )
        })?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Resolve the API key: OS keyring first, then `VOLLAND_API_KEY`.
    pub fn resolve_api_key() -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        // 2. Try Environment Variable
        env::var("VOLLAND_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Bytes) -> Result<TransportReply> {
        let response = self
            .client
            .post(&self.base_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let reason = status.canonical_reason().map(str::to_string);
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(TransportReply {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::TransportTimeout
    } else {
        Error::Transport(TransportError::Http(e))
    }
}
