//! Per-run settings.
//!
//! Settings are loaded once per test run and passed explicitly to whatever
//! needs them; there is no process-wide settings object.

use crate::error::ConfigError;
use crate::poll::Poller;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Poller defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Maximum wait (in ms)
    pub timeout_ms: u64,
    /// Pause between evaluations (in ms)
    pub delay_ms: u64,
    /// Whether condition errors are retried instead of propagated
    pub handle_errors: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 120_000,
            delay_ms: 1_000,
            handle_errors: false,
        }
    }
}

impl PollConfig {
    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay as a duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub poll: PollConfig,
    /// YAML document holding the provider data for this run
    pub test_data: Option<PathBuf>,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            test_data: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from a YAML string. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_yaml_str(&contents)?;

        // relative test data paths are resolved against the settings file
        if let (Some(data), Some(dir)) = (settings.test_data.as_ref(), path.parent()) {
            if data.is_relative() {
                settings.test_data = Some(dir.join(data));
            }
        }
        Ok(settings)
    }

    /// A poller carrying the configured defaults
    pub fn poller<'a>(&self) -> Poller<'a> {
        Poller::from_config(&self.poll)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.delay_ms > self.poll.timeout_ms && self.poll.timeout_ms > 0 {
            return Err(ConfigError::Invalid(format!(
                "poll.delay_ms ({}) exceeds poll.timeout_ms ({})",
                self.poll.delay_ms, self.poll.timeout_ms
            )));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".to_string()));
        }
        Ok(())
    }
}
