//! Non-fatal assertions.
//!
//! A [`SoftAssert`] records failed checks and lets the test continue, so one
//! run reports every mismatch (all missing widgets on a dashboard, say)
//! instead of stopping at the first.

use crate::error::SoftAssertError;
use parking_lot::Mutex;
use tracing::warn;

#[derive(Debug, Default)]
pub struct SoftAssert {
    failures: Mutex<Vec<String>>,
}

impl SoftAssert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` as a failure unless `condition` holds.
    ///
    /// Returns `condition` so callers can branch on it.
    pub fn check(&self, condition: bool, message: impl Into<String>) -> bool {
        if !condition {
            let message = message.into();
            warn!("Soft assertion failed: {}", message);
            self.failures.lock().push(message);
        }
        condition
    }

    /// Like [`check`](SoftAssert::check), building the message only on failure
    pub fn check_with(&self, condition: bool, message: impl FnOnce() -> String) -> bool {
        if condition {
            true
        } else {
            self.check(false, message())
        }
    }

    /// Record a failure when `actual != expected`
    pub fn check_eq<T>(&self, actual: T, expected: T, what: &str) -> bool
    where
        T: PartialEq + std::fmt::Debug,
    {
        self.check_with(actual == expected, || {
            format!("{}: expected {:?}, got {:?}", what, expected, actual)
        })
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Fail with every recorded message, or succeed if none were recorded
    pub fn finish(self) -> Result<(), SoftAssertError> {
        let failures = self.failures.into_inner();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SoftAssertError { failures })
        }
    }
}
