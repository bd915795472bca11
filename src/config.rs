//! Static client settings.
//!
//! Defaults mirror the service's documented limits. Every field can be
//! overridden from the environment so deployments don't need code changes:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `VOLLAND_BASE_URL` | `base_url` | `https://prod-api.vol.land/api/v1/volland` |
//! | `VOLLAND_RPS` | `requests_per_second` | 2 |
//! | `VOLLAND_MAX_PER_TRANSMISSION` | `max_per_transmission` | 20 |
//! | `VOLLAND_RESULT_TIMEOUT_MS` | `result_timeout` | 5000 ms |
//! | `VOLLAND_HTTP_TIMEOUT_SECS` | `http_timeout` | 60 s |
//! | `VOLLAND_STRICT_TICKERS` | `strict_tickers` | off (`1` enables) |

use std::env;
use std::time::Duration;

use crate::{Error, ErrorContext, Result};

/// Highest rate that still yields a whole-millisecond tick period.
pub const MAX_REQUESTS_PER_SECOND: u32 = 1000;

pub const DEFAULT_BASE_URL: &str = "https://prod-api.vol.land/api/v1/volland";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Scheduler ticks per second, 1 to 1000; the tick period is `1000ms / rate`.
    pub requests_per_second: u32,
    /// Cap on same-kind requests drained into one transmission.
    pub max_per_transmission: usize,
    /// How long a caller waits for its result before giving up.
    pub result_timeout: Duration,
    pub http_timeout: Duration,
    /// Reject tickers missing from [`crate::tickers::SUPPORTED_TICKERS`] before enqueueing.
    pub strict_tickers: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_second: 2,
            max_per_transmission: 20,
            result_timeout: Duration::from_millis(5000),
            http_timeout: Duration::from_secs(60),
            strict_tickers: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("VOLLAND_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Some(rps) = env_parse::<u32>("VOLLAND_RPS") {
            self.requests_per_second = rps;
        }
        if let Some(max) = env_parse::<usize>("VOLLAND_MAX_PER_TRANSMISSION") {
            self.max_per_transmission = max;
        }
        if let Some(ms) = env_parse::<u64>("VOLLAND_RESULT_TIMEOUT_MS") {
            self.result_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("VOLLAND_HTTP_TIMEOUT_SECS") {
            self.http_timeout = Duration::from_secs(secs);
        }
        if let Ok(v) = env::var("VOLLAND_STRICT_TICKERS") {
            self.strict_tickers = v == "1" || v.eq_ignore_ascii_case("true");
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = rps;
        self
    }

    pub fn with_max_per_transmission(mut self, max: usize) -> Self {
        self.max_per_transmission = max;
        self
    }

    pub fn with_result_timeout(mut self, timeout: Duration) -> Self {
        self.result_timeout = timeout;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_strict_tickers(mut self, strict: bool) -> Self {
        self.strict_tickers = strict;
        self
    }

    /// Scheduler tick period.
    pub fn tick_period(&self) -> Duration {
        let rate = self.requests_per_second.clamp(1, MAX_REQUESTS_PER_SECOND);
        Duration::from_millis(1000 / u64::from(rate))
    }

    pub fn validate(&self) -> Result<()> {
        if self.requests_per_second == 0 {
            return Err(Error::configuration_with_context(
                "requests_per_second must be at least 1",
                ErrorContext::new()
                    .with_field_path("config.requests_per_second")
                    .with_source("client_config"),
            ));
        }
        if self.requests_per_second > MAX_REQUESTS_PER_SECOND {
            return Err(Error::configuration_with_context(
                "requests_per_second must be at most 1000",
                ErrorContext::new()
                    .with_field_path("config.requests_per_second")
                    .with_details(format!("got {}", self.requests_per_second))
                    .with_source("client_config"),
            ));
        }
        if self.max_per_transmission == 0 {
            return Err(Error::configuration_with_context(
                "max_per_transmission must be at least 1",
                ErrorContext::new()
                    .with_field_path("config.max_per_transmission")
                    .with_source("client_config"),
            ));
        }
        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(e.to_string())
                    .with_source("client_config"),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.requests_per_second, 2);
        assert_eq!(cfg.max_per_transmission, 20);
        assert_eq!(cfg.result_timeout, Duration::from_millis(5000));
        assert_eq!(cfg.http_timeout, Duration::from_secs(60));
        assert_eq!(cfg.tick_period(), Duration::from_millis(500));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let cfg = ClientConfig::new()
            .with_requests_per_second(4)
            .with_max_per_transmission(5)
            .with_result_timeout(Duration::from_millis(250))
            .with_strict_tickers(true);
        assert_eq!(cfg.tick_period(), Duration::from_millis(250));
        assert_eq!(cfg.max_per_transmission, 5);
        assert!(cfg.strict_tickers);
    }

    #[test]
    fn test_tick_period_never_zero() {
        let fastest = ClientConfig::new().with_requests_per_second(MAX_REQUESTS_PER_SECOND);
        assert_eq!(fastest.tick_period(), Duration::from_millis(1));
        let beyond = ClientConfig::new().with_requests_per_second(u32::MAX);
        assert_eq!(beyond.tick_period(), Duration::from_millis(1));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_rate = ClientConfig::new().with_requests_per_second(0);
        assert!(matches!(
            zero_rate.validate(),
            Err(Error::Configuration { .. })
        ));

        let too_fast = ClientConfig::new().with_requests_per_second(2000);
        let err = too_fast.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("config.requests_per_second")
        );
        assert!(ClientConfig::new()
            .with_requests_per_second(MAX_REQUESTS_PER_SECOND)
            .validate()
            .is_ok());

        let zero_cap = ClientConfig::new().with_max_per_transmission(0);
        assert!(zero_cap.validate().is_err());

        let bad_url = ClientConfig::new().with_base_url("not a url");
        let err = bad_url.validate().unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("config.base_url")
        );
    }
}
