//! Batched client for the Volland API.
//!
//! Keep the public surface small: build a [`VollandClient`], ask for a result,
//! get `Ok(None)` if it doesn't arrive in time. Queueing, scheduling and
//! correlation live in [`crate::batch`].

pub mod builder;
pub mod core;
pub mod signals;

pub use builder::VollandClientBuilder;
pub use core::VollandClient;
pub use signals::{QueueSnapshot, SignalsSnapshot};
