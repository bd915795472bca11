//! 请求批处理模块：按类型收集待发请求，定时批量发送，并按位置回填结果。
//!
//! # Request Batching Module
//!
//! Callers never talk to the network directly. Each request is queued together
//! with a [`ResultSlot`]; a [`BatchScheduler`] wakes at the configured rate,
//! drains up to `max_per_transmission` requests of each kind, and hands every
//! drained group to the [`Dispatcher`], which sends them as one transmission
//! and writes the `i`-th reply into the `i`-th request's slot.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`PendingQueue`] | FIFO of queued requests, drained per kind |
//! | [`ResultSlot`] | Write-once result cell with a bounded wait |
//! | [`Dispatcher`] | One transmission: charge, send, correlate by position |
//! | [`BatchReport`] | Delivered and skipped positions of one batch |
//! | [`BatchScheduler`] | Periodic drain loop, one batch per kind per tick |
//!
//! ## Failure Handling
//!
//! - A batch-level failure (transport, status, token shortage, count mismatch)
//!   leaves every slot in that batch empty; callers observe a timeout.
//! - An item-level failure skips only that position.
//! - Failed requests are never requeued.

mod dispatcher;
mod queue;
mod scheduler;
mod slot;

pub use dispatcher::{BatchReport, Dispatcher};
pub use queue::PendingQueue;
pub use scheduler::BatchScheduler;
pub use slot::ResultSlot;
