//! API 额度模块：跟踪剩余的付费请求额度。
//!
//! # API Token Budget Module
//!
//! Every request sent to the service consumes one paid token. The budget is
//! charged once per transmission, before the network call, so a batch is
//! either paid for in full or not sent at all.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`TokenBudget`] | Shared remaining-credit counter |
//! | [`TokenBudgetSnapshot`] | Point-in-time view for diagnostics |
//!
//! ## Example
//!
//! ```rust
//! use volland_rs::tokens::TokenBudget;
//!
//! let budget = TokenBudget::new(3);
//! assert!(budget.charge(2));
//! assert!(!budget.charge(2)); // only 1 left, counter untouched
//! assert_eq!(budget.remaining(), 1);
//!
//! // Refreshed from the account status out of band
//! budget.set_remaining(100);
//! ```
//!
//! The budget is an explicit object: share one `Arc<TokenBudget>` between every
//! client that draws on the same account.

mod budget;

pub use budget::{TokenBudget, TokenBudgetSnapshot};
