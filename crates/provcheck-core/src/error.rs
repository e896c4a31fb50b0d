use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The poller's deadline passed without the condition becoming truthy.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Timed out after {elapsed:?} ({attempts} attempts) waiting for {message}")]
pub struct TimeoutExceeded<T: Debug> {
    /// Description of what was awaited
    pub message: String,
    /// Last falsy value the condition produced, if any attempt produced one
    pub last_value: Option<T>,
    /// Text of the last handled condition error, if errors were being handled
    pub last_error: Option<String>,
    /// Number of times the condition was evaluated
    pub attempts: usize,
    /// Time from the first evaluation until the poller gave up
    pub elapsed: Duration,
}

/// Error type for fallible polling
#[derive(Debug, Error)]
pub enum PollError<T: Debug, E: std::error::Error + 'static> {
    /// Deadline reached
    #[error(transparent)]
    Timeout(#[from] TimeoutExceeded<T>),

    /// The condition itself failed; the error is passed through untouched
    #[error("Condition failed on attempt {attempt}: {source}")]
    Condition {
        /// Attempt number (1-based) that produced the error
        attempt: usize,
        /// Error returned by the condition
        #[source]
        source: E,
    },
}

impl<T: Debug, E: std::error::Error + 'static> PollError<T, E> {
    /// Returns true if the poller gave up because of its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout(_))
    }

    /// Unwraps the condition's own error, if that is what stopped the poller.
    pub fn into_condition_error(self) -> Option<E> {
        match self {
            PollError::Condition { source, .. } => Some(source),
            PollError::Timeout(_) => None,
        }
    }
}

/// Error types for settings loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("Failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Settings parsed but hold an unusable value
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
