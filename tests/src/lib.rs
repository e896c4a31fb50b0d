// This is a meta-package for organizing the end-to-end test structure
// of the provcheck project.

// Re-export tests that should be accessible
// to other test packages or tools
#[cfg(feature = "e2e")]
pub use provcheck_e2e_tests;

/// Re-export test modules for easier access
pub mod tests {
    #[cfg(feature = "e2e")]
    pub use provcheck_e2e_tests as e2e;
}
