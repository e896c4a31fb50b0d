//! Collaborator interfaces of the system under test, with mockall mocks.
//!
//! Tests drive the poller and the matrix runner against these instead of a
//! real appliance.

pub mod dashboard;
pub mod provisioning;

// Re-export all mocks for easy access
pub use dashboard::*;
pub use provisioning::*;
