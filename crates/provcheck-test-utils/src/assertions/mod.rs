//! Assertion utilities for matrices and poll timings.
//!
//! Each helper returns a `Result` so tests can `?` it or `unwrap()` it for a
//! readable failure message.

mod matrix;
mod timing;

// Re-export all assertion helpers for easy access
pub use matrix::*;
pub use timing::*;
