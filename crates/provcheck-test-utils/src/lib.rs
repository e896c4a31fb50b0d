//! Testing utilities for provider matrix tests.
//!
//! This crate provides the helpers end-to-end tests lean on around the poller
//! and the matrix generator: soft assertions, finalizers, random names,
//! provider and test-data builders, assertion helpers, mocks and in-memory
//! fakes of the systems being driven.

pub mod assertions;
pub mod builders;
pub mod config;
pub mod data_generators;
pub mod error;
pub mod finalizers;
pub mod implementations;
pub mod mocks;
pub mod soft_assert;

/// Re-export commonly used types for convenience
pub use mockall;

pub use assertions::{assert_elapsed_at_least, assert_matrix_consistent, assert_matrix_ids};
pub use builders::{ProviderBuilder, TestDataBuilder};
pub use config::{load_test_data, TestConfig};
pub use data_generators::{gen_alphanumeric, gen_alphanumeric_with_prefix};
pub use error::{SoftAssertError, TestError};
pub use finalizers::Finalizers;
pub use soft_assert::SoftAssert;

/// Set up tracing for a test binary; repeated calls are no-ops
pub fn init_test_tracing() {
    provcheck_core::init_tracing("debug");
}
