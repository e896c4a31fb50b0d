//! Assertion utilities for poll results.

use provcheck_core::Polled;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimingValidationError {
    #[error("Finished after {actual:?}, expected at least {minimum:?}")]
    TooFast { minimum: Duration, actual: Duration },

    #[error("Took {actual} attempts, expected {expected}")]
    Attempts { expected: usize, actual: usize },
}

/// Asserts that a wait lasted at least `minimum`.
pub fn assert_elapsed_at_least(elapsed: Duration, minimum: Duration) -> Result<(), TimingValidationError> {
    if elapsed < minimum {
        return Err(TimingValidationError::TooFast {
            minimum,
            actual: elapsed,
        });
    }
    Ok(())
}

/// Asserts that a successful poll took `expected` evaluations and at least
/// one `delay` between each of them.
pub fn assert_polled<T>(polled: &Polled<T>, expected: usize, delay: Duration) -> Result<(), TimingValidationError> {
    if polled.attempts != expected {
        return Err(TimingValidationError::Attempts {
            expected,
            actual: polled.attempts,
        });
    }
    let pauses = u32::try_from(expected.saturating_sub(1)).unwrap_or(u32::MAX);
    assert_elapsed_at_least(polled.elapsed, delay.saturating_mul(pauses))
}
