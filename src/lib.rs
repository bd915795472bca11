//! # volland-rs
//!
//! Volland 期权分析 API 的批处理客户端：按类型合并请求、限速发送、按位置关联响应。
//!
//! Batched, rate-limited client for the Volland options analytics API.
//!
//! ## Overview
//!
//! The service accepts a package of requests per call and answers with an array
//! of replies in the same order. This crate hides that shape: callers ask for a
//! single result and wait, while a background scheduler groups queued requests
//! of the same kind, sends at most `requests_per_second` packages per second,
//! and routes the `i`-th reply back to the `i`-th request.
//!
//! ## Core Behavior
//!
//! - **Batched**: up to `max_per_transmission` same-kind requests per call
//! - **Rate-limited**: one drain pass per scheduler tick
//! - **Budgeted**: each request costs one API token, charged before sending
//! - **Bounded waits**: a result that doesn't arrive in time is `Ok(None)`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use volland_rs::{Greek, OptionKind, VollandClient};
//!
//! #[tokio::main]
//! async fn main() -> volland_rs::Result<()> {
//!     let client = VollandClient::builder()
//!         .api_key("your-api-key")
//!         .tokens_remaining(1000)
//!         .build()
//!         .await?;
//!
//!     if let Some(gex) = client
//!         .request_exposure("SPX", OptionKind::Both, Greek::Gamma, None)
//!         .await?
//!     {
//!         println!("{} spot {}", gex, gex.spot_price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client and builder |
//! | [`batch`] | Pending queue, scheduler, dispatcher, result slots |
//! | [`request`] | Typed requests and the request package |
//! | [`response`] | Lenient decoding of reply nodes |
//! | [`result`] | Validated, typed results |
//! | [`tokens`] | API token budget |
//! | [`transport`] | Transport trait and the reqwest implementation |
//! | [`config`] | Static settings and environment overrides |
//! | [`types`] | Request kinds, greeks, option kinds, paradigms |
//! | [`tickers`] | Supported ticker table |

pub mod batch;
pub mod client;
pub mod config;
pub mod request;
pub mod response;
pub mod result;
pub mod tickers;
pub mod tokens;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{SignalsSnapshot, VollandClient, VollandClientBuilder};
pub use config::ClientConfig;
pub use request::{
    ExposureRequest, ParadigmRequest, Request, RequestBody, TrendRequest, ZeroDteRequest,
};
pub use result::{
    ExposurePoint, ExposureResult, ParadigmResult, QueryResult, TrendPoint, TrendResult,
    ZeroDteResult,
};
pub use tokens::TokenBudget;
pub use types::{Greek, OptionKind, Paradigm, RequestKind};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
