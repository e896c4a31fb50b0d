use crate::error::TestError;
use provcheck_core::{PollConfig, Poller, Settings};
use provcheck_matrix::TestData;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing for tests that poll fakes instead of a real system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    pub timeout: Duration,
    pub retry_interval: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retry_interval: Duration::from_millis(10),
        }
    }
}

impl TestConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            delay_ms: u64::try_from(self.retry_interval.as_millis()).unwrap_or(u64::MAX),
            handle_errors: false,
        }
    }

    /// Settings for a test run, with a test-friendly log filter
    pub fn settings(&self) -> Settings {
        Settings {
            poll: self.poll_config(),
            log_filter: "debug".to_string(),
            ..Default::default()
        }
    }

    pub fn poller<'a>(&self) -> Poller<'a> {
        Poller::from_config(&self.poll_config())
    }
}

/// Load the test data document named by `settings`
pub fn load_test_data(settings: &Settings) -> Result<TestData, TestError> {
    let path = settings
        .test_data
        .as_ref()
        .ok_or_else(|| TestError::TestSetupFailed("no test_data path in settings".to_string()))?;
    Ok(TestData::from_path(path)?)
}
