//! Builders for provider entries and test-data documents.

mod provider;
mod test_data;

// Re-export all builders for easy access
pub use provider::*;
pub use test_data::*;
