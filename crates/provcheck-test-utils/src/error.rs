use thiserror::Error;

/// Soft assertions that failed during a test
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} soft assertion(s) failed:\n  {}", .failures.len(), .failures.join("\n  "))]
pub struct SoftAssertError {
    pub failures: Vec<String>,
}

/// Error types for the test utilities
#[derive(Debug, Error)]
pub enum TestError {
    /// Collected soft assertion failures
    #[error(transparent)]
    SoftAssert(#[from] SoftAssertError),

    /// Test data could not be loaded
    #[error("Test data error: {0}")]
    Data(#[from] provcheck_matrix::DataError),

    /// Settings could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] provcheck_core::ConfigError),

    /// One or more cleanup steps failed
    #[error("{} finalizer(s) failed: {}", .0.len(), .0.join("; "))]
    Finalizers(Vec<String>),

    /// Test setup failed
    #[error("Test setup failed: {0}")]
    TestSetupFailed(String),
}
