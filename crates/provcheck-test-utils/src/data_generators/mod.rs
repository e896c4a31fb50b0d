//! Test data generators.
//!
//! Random names for objects a test creates, and canned test-data documents.

mod documents;
mod names;

// Re-export all data generators for easy access
pub use documents::*;
pub use names::*;
