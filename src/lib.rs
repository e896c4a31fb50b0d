//! # provcheck
//!
//! Helpers for end-to-end suites that drive an eventually consistent system
//! across many configured providers:
//!
//! * [`poll`] / [`Poller`]: wait until a condition becomes truthy or a
//!   deadline passes
//! * [`generate`] / [`MatrixGenerator`]: turn provider test data into one
//!   parameter set per provider that has the fields a test needs
//!
//! ```
//! use provcheck::{poll, FieldRequirement, MatrixGenerator, TestData};
//! use std::time::Duration;
//!
//! let data = TestData::from_yaml_str("providers:\n  A: {provisioning: {host: h1}}\n  B: {provisioning: {}}\n").unwrap();
//! let matrix = MatrixGenerator::new()
//!     .require(FieldRequirement::exists(["provisioning", "host"]))
//!     .generate(data.providers());
//! assert_eq!(matrix.ids(), vec!["A"]);
//!
//! let mut calls = 0;
//! let polled = poll(|| { calls += 1; calls >= 3 }, Duration::from_secs(1), Duration::ZERO, None, None).unwrap();
//! assert_eq!(polled.attempts, 3);
//! ```

#![forbid(unsafe_code)]

pub use provcheck_core::{
    init_tracing, init_tracing_from, poll, ConfigError, PollConfig, PollError, PollState, Polled,
    Poller, Settings, TimeoutExceeded, Truthy,
};
pub use provcheck_matrix::{
    generate, ArgValue, Args, CaseOutcome, ConfigEntry, DataError, FieldRequirement, Matrix,
    MatrixGenerator, MatrixRunner, ParameterSet, Path, ProviderClass, RunError, RunStatus,
    RunSummary, Selector, TestData,
};

#[cfg(feature = "async")]
pub use provcheck_core::poll_async;
