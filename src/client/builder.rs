use crate::batch::{BatchScheduler, Dispatcher, PendingQueue};
use crate::client::core::VollandClient;
use crate::config::ClientConfig;
use crate::tokens::TokenBudget;
use crate::transport::{HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for creating clients with custom configuration.
///
/// Settings resolve in this order, later wins: [`ClientConfig`] defaults (or the
/// config passed to [`config`](Self::config)), `VOLLAND_*` environment
/// variables, then explicit builder calls.
pub struct VollandClientBuilder {
    config: ClientConfig,
    api_key: Option<String>,
    initial_tokens: Option<i64>,
    budget: Option<Arc<TokenBudget>>,
    transport: Option<Arc<dyn Transport>>,
    requests_per_second: Option<u32>,
    max_per_transmission: Option<usize>,
    result_timeout: Option<Duration>,
    http_timeout: Option<Duration>,
    strict_tickers: Option<bool>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl VollandClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            api_key: None,
            initial_tokens: None,
            budget: None,
            transport: None,
            requests_per_second: None,
            max_per_transmission: None,
            result_timeout: None,
            http_timeout: None,
            strict_tickers: None,
            base_url_override: None,
        }
    }

    /// Start from an explicit config instead of the defaults.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// API key sent as `X-API-KEY`.
    ///
    /// When unset, the OS keyring (`volland` / `api-key`) and then
    /// `VOLLAND_API_KEY` are tried.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Create a fresh budget holding `n` tokens. Ignored if
    /// [`token_budget`](Self::token_budget) is also set.
    pub fn tokens_remaining(mut self, n: i64) -> Self {
        self.initial_tokens = Some(n);
        self
    }

    /// Draw on an existing budget, typically one shared by several clients on
    /// the same account.
    pub fn token_budget(mut self, budget: Arc<TokenBudget>) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Replace the HTTP transport. No API key is required in this case.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    pub fn max_per_transmission(mut self, max: usize) -> Self {
        self.max_per_transmission = Some(max);
        self
    }

    pub fn result_timeout(mut self, timeout: Duration) -> Self {
        self.result_timeout = Some(timeout);
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Reject tickers outside [`crate::tickers::SUPPORTED_TICKERS`] before enqueueing.
    pub fn strict_tickers(mut self, enable: bool) -> Self {
        self.strict_tickers = Some(enable);
        self
    }

    /// Override the service base URL.
    ///
    /// This is primarily for testing with mock servers.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    fn resolve_config(&self) -> ClientConfig {
        let mut config = self.config.clone().with_env_overrides();
        if let Some(url) = &self.base_url_override {
            config.base_url = url.clone();
        }
        if let Some(rps) = self.requests_per_second {
            config.requests_per_second = rps;
        }
        if let Some(max) = self.max_per_transmission {
            config.max_per_transmission = max;
        }
        if let Some(t) = self.result_timeout {
            config.result_timeout = t;
        }
        if let Some(t) = self.http_timeout {
            config.http_timeout = t;
        }
        if let Some(strict) = self.strict_tickers {
            config.strict_tickers = strict;
        }
        config
    }

    /// Build the client and start its batch scheduler.
    ///
    /// Must be awaited inside a tokio runtime.
    pub async fn build(self) -> Result<VollandClient> {
        let config = self.resolve_config();
        config.validate()?;

        let budget = match (self.budget, self.initial_tokens) {
            (Some(budget), _) => budget,
            (None, Some(n)) => Arc::new(TokenBudget::new(n)),
            (None, None) => {
                return Err(Error::configuration_with_context(
                    "token budget not set; call tokens_remaining() or token_budget()",
                    ErrorContext::new()
                        .with_field_path("client.tokens_remaining")
                        .with_source("client_builder"),
                ))
            }
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let key = self
                    .api_key
                    .filter(|k| !k.trim().is_empty())
                    .or_else(HttpTransport::resolve_api_key)
                    .ok_or_else(|| {
                        Error::configuration_with_context(
                            "no API key found",
                            ErrorContext::new()
                                .with_field_path("client.api_key")
                                .with_details("set it on the builder, in the OS keyring, or in VOLLAND_API_KEY")
                                .with_source("client_builder"),
                        )
                    })?;
                Arc::new(HttpTransport::new(&config.base_url, &key, config.http_timeout)?)
            }
        };

        let queue = Arc::new(PendingQueue::new());
        let dispatcher = Arc::new(Dispatcher::new(transport, budget));
        let scheduler = BatchScheduler::spawn(
            Arc::clone(&queue),
            Arc::clone(&dispatcher),
            config.tick_period(),
            config.max_per_transmission,
        );

        info!(
            base_url = %config.base_url,
            tokens_remaining = dispatcher.budget().remaining(),
            "volland client ready"
        );

        Ok(VollandClient {
            config,
            queue,
            dispatcher,
            scheduler,
        })
    }
}

impl Default for VollandClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
