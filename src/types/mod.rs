//! 类型系统模块：定义请求种类与期权市场相关的枚举类型。
//!
//! # Types Module
//!
//! Core enums shared by requests, responses, and results.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RequestKind`] | Discriminator for the four request/response families |
//! | [`Greek`] | Option greek an exposure or trend is computed for |
//! | [`OptionKind`] | Calls, puts, or both |
//! | [`Paradigm`] | Market-structure classification label |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`kind`] | Request kind and its `request_type` wire tag |
//! | [`market`] | Greek, option side, and paradigm labels |
//!
//! ## Example
//!
//! ```rust
//! use volland_rs::types::{Greek, RequestKind};
//!
//! assert_eq!(RequestKind::from_tag("trend_request"), Some(RequestKind::Trend));
//! assert_eq!(Greek::Gamma.as_str(), "gamma");
//! ```

pub mod kind;
pub mod market;

pub use kind::RequestKind;
pub use market::{Greek, OptionKind, Paradigm};
