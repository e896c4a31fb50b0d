//!
//! Provcheck Core - waiting primitives for end-to-end suites
//!
//! This crate provides the condition poller used to await eventually
//! consistent state in an external system, together with the per-run
//! settings and logging setup shared by the other provcheck crates.

#![forbid(unsafe_code)]

/// Settings and poller defaults
pub mod config;

/// Error types
pub mod error;

/// Tracing setup
pub mod logging;

/// Condition polling
pub mod poll;

/// Truthiness of condition results
pub mod truthy;

pub use config::{PollConfig, Settings};
pub use error::{ConfigError, PollError, TimeoutExceeded};
pub use logging::{init_tracing, init_tracing_from};
pub use poll::{poll, PollState, Polled, Poller};
pub use truthy::Truthy;

#[cfg(feature = "async")]
pub use poll::poll_async;
