//! Waiting for eventually-consistent state.
//!
//! A [`Poller`] re-evaluates a condition at a fixed delay until it returns a
//! [truthy](crate::Truthy) value or the timeout passes. The timeout is
//! measured from the first evaluation and the condition is always evaluated
//! at least once, so a zero timeout means "check exactly once".
//!
//! ```
//! use provcheck_core::poll::Poller;
//! use std::time::Duration;
//!
//! let mut calls = 0;
//! let polled = Poller::new(Duration::from_secs(1))
//!     .delay(Duration::from_millis(10))
//!     .message("counter to reach 3")
//!     .until(|| {
//!         calls += 1;
//!         calls >= 3
//!     })
//!     .unwrap();
//! assert_eq!(polled.attempts, 3);
//! ```

#[cfg(feature = "async")]
mod async_poll;

use crate::config::PollConfig;
use crate::error::{PollError, TimeoutExceeded};
use crate::truthy::Truthy;
use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

#[cfg(feature = "async")]
pub use async_poll::poll_async;

/// Default time to wait before giving up
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default pause between two evaluations
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_MESSAGE: &str = "condition";

/// Lifecycle of a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Created, nothing evaluated yet
    Pending,
    /// The condition is being evaluated
    Evaluating,
    /// The last evaluation was falsy and the deadline has not passed
    Retrying,
    /// A truthy value was returned
    Succeeded,
    /// The deadline passed
    TimedOut,
}

impl PollState {
    /// Returns true for states a wait never leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, PollState::Succeeded | PollState::TimedOut)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: PollState) -> bool {
        use PollState::*;
        matches!(
            (self, next),
            (Pending, Evaluating)
                | (Evaluating, Succeeded)
                | (Evaluating, Retrying)
                | (Evaluating, TimedOut)
                | (Retrying, Evaluating)
                | (Retrying, TimedOut)
        )
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollState::Pending => write!(f, "PENDING"),
            PollState::Evaluating => write!(f, "EVALUATING"),
            PollState::Retrying => write!(f, "RETRYING"),
            PollState::Succeeded => write!(f, "SUCCEEDED"),
            PollState::TimedOut => write!(f, "TIMED_OUT"),
        }
    }
}

/// Successful result of a wait
#[derive(Debug, Clone, PartialEq)]
pub struct Polled<T> {
    /// The truthy value returned by the condition
    pub value: T,
    /// Time from the first evaluation to the successful one
    pub elapsed: Duration,
    /// Number of evaluations, including the successful one
    pub attempts: usize,
}

impl<T> Polled<T> {
    /// Discards the timing information.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Retry-until-truthy utility.
///
/// Built with a timeout and refined with the builder methods; consumed by
/// [`until`](Poller::until) or [`try_until`](Poller::try_until).
pub struct Poller<'a> {
    timeout: Duration,
    delay: Duration,
    message: Option<String>,
    fail_func: Option<Box<dyn FnMut() + 'a>>,
    handle_errors: bool,
}

impl Debug for Poller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("timeout", &self.timeout)
            .field("delay", &self.delay)
            .field("message", &self.message)
            .field("has_fail_func", &self.fail_func.is_some())
            .field("handle_errors", &self.handle_errors)
            .finish()
    }
}

impl Default for Poller<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl<'a> Poller<'a> {
    /// Create a poller that gives up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            delay: DEFAULT_DELAY,
            message: None,
            fail_func: None,
            handle_errors: false,
        }
    }

    /// Create a poller from configured defaults
    pub fn from_config(config: &PollConfig) -> Self {
        Self::new(config.timeout())
            .delay(config.delay())
            .handle_errors(config.handle_errors)
    }

    /// Pause between two evaluations
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Description of what is awaited, used in logs and in the timeout error
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Hook run after each falsy evaluation, right before the next one
    ///
    /// Typically forces the observed state to refresh (reload a page,
    /// re-fetch a REST entity).
    pub fn fail_func(mut self, fail_func: impl FnMut() + 'a) -> Self {
        self.fail_func = Some(Box::new(fail_func));
        self
    }

    /// Treat condition errors as falsy results instead of stopping
    pub fn handle_errors(mut self, handle_errors: bool) -> Self {
        self.handle_errors = handle_errors;
        self
    }

    /// Configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for an infallible condition.
    pub fn until<T, F>(self, mut condition: F) -> Result<Polled<T>, TimeoutExceeded<T>>
    where
        T: Truthy + Debug,
        F: FnMut() -> T,
    {
        match self.try_until(|| Ok::<T, Infallible>(condition())) {
            Ok(polled) => Ok(polled),
            Err(PollError::Timeout(timeout)) => Err(timeout),
            Err(PollError::Condition { source, .. }) => match source {},
        }
    }

    /// Wait for a fallible condition.
    ///
    /// An `Err` from the condition ends the wait immediately with
    /// [`PollError::Condition`], unless [`handle_errors`](Poller::handle_errors)
    /// is set, in which case it counts as one more falsy attempt.
    pub fn try_until<T, E, F>(mut self, mut condition: F) -> Result<Polled<T>, PollError<T, E>>
    where
        T: Truthy + Debug,
        E: std::error::Error + 'static,
        F: FnMut() -> Result<T, E>,
    {
        let mut tracker = Tracker::new(self.describe(), self.timeout, self.handle_errors);
        let start = Instant::now();
        tracker.begin(self.delay);

        loop {
            let outcome = condition();
            match tracker.observe(outcome, start.elapsed()) {
                Step::Finished(result) => return result,
                Step::Retry => {
                    std::thread::sleep(tracker.pause(self.delay, start.elapsed()));
                    if let Step::Finished(result) = tracker.check_deadline(start.elapsed()) {
                        return result;
                    }
                    if let Some(fail_func) = self.fail_func.as_mut() {
                        fail_func();
                    }
                }
            }
        }
    }

    fn describe(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
    }
}

/// Wait for `condition` to become truthy.
///
/// Shorthand for building a [`Poller`] by hand.
pub fn poll<T, F>(
    condition: F,
    timeout: Duration,
    delay: Duration,
    fail_func: Option<&mut dyn FnMut()>,
    message: Option<&str>,
) -> Result<Polled<T>, TimeoutExceeded<T>>
where
    T: Truthy + Debug,
    F: FnMut() -> T,
{
    let mut poller = Poller::new(timeout).delay(delay);
    if let Some(fail_func) = fail_func {
        poller = poller.fail_func(move || fail_func());
    }
    if let Some(message) = message {
        poller = poller.message(message);
    }
    poller.until(condition)
}

pub(crate) enum Step<T: Debug, E: std::error::Error + 'static> {
    Finished(Result<Polled<T>, PollError<T, E>>),
    Retry,
}

/// Attempt bookkeeping shared by the blocking and async pollers.
///
/// Elapsed time is passed in so each flavour can use its own clock.
pub(crate) struct Tracker<T> {
    message: String,
    timeout: Duration,
    handle_errors: bool,
    state: PollState,
    attempts: usize,
    last_value: Option<T>,
    last_error: Option<String>,
}

impl<T: Truthy + Debug> Tracker<T> {
    pub(crate) fn new(message: String, timeout: Duration, handle_errors: bool) -> Self {
        Self {
            message,
            timeout,
            handle_errors,
            state: PollState::Pending,
            attempts: 0,
            last_value: None,
            last_error: None,
        }
    }

    pub(crate) fn begin(&mut self, delay: Duration) {
        debug!(
            timeout = ?self.timeout,
            delay = ?delay,
            "Waiting for {}", self.message
        );
        self.transition(PollState::Evaluating);
    }

    pub(crate) fn observe<E>(&mut self, outcome: Result<T, E>, elapsed: Duration) -> Step<T, E>
    where
        E: std::error::Error + 'static,
    {
        if self.state == PollState::Retrying {
            self.transition(PollState::Evaluating);
        }
        self.attempts += 1;

        match outcome {
            Ok(value) if value.is_truthy() => {
                self.transition(PollState::Succeeded);
                info!(
                    attempts = self.attempts,
                    elapsed = ?elapsed,
                    "Condition satisfied: {}", self.message
                );
                return Step::Finished(Ok(Polled {
                    value,
                    elapsed,
                    attempts: self.attempts,
                }));
            }
            Ok(value) => {
                debug!(attempt = self.attempts, value = ?value, "Condition not met yet: {}", self.message);
                self.last_value = Some(value);
            }
            Err(err) if self.handle_errors => {
                debug!(attempt = self.attempts, error = %err, "Condition errored, retrying: {}", self.message);
                self.last_error = Some(err.to_string());
            }
            Err(err) => {
                warn!(attempt = self.attempts, error = %err, "Condition errored: {}", self.message);
                return Step::Finished(Err(PollError::Condition {
                    attempt: self.attempts,
                    source: err,
                }));
            }
        }

        if elapsed >= self.timeout {
            return Step::Finished(Err(self.time_out(elapsed)));
        }

        self.transition(PollState::Retrying);
        Step::Retry
    }

    /// Time to sleep before the next evaluation, never past the deadline
    pub(crate) fn pause(&self, delay: Duration, elapsed: Duration) -> Duration {
        delay.min(self.timeout.saturating_sub(elapsed))
    }

    /// Ends the wait if the deadline passed while sleeping, so nothing is
    /// evaluated after it.
    pub(crate) fn check_deadline<E>(&mut self, elapsed: Duration) -> Step<T, E>
    where
        E: std::error::Error + 'static,
    {
        if elapsed >= self.timeout {
            Step::Finished(Err(self.time_out(elapsed)))
        } else {
            Step::Retry
        }
    }

    fn time_out<E>(&mut self, elapsed: Duration) -> PollError<T, E>
    where
        E: std::error::Error + 'static,
    {
        self.transition(PollState::TimedOut);
        warn!(
            attempts = self.attempts,
            elapsed = ?elapsed,
            "Timeout waiting for: {}", self.message
        );
        PollError::Timeout(TimeoutExceeded {
            message: std::mem::take(&mut self.message),
            last_value: self.last_value.take(),
            last_error: self.last_error.take(),
            attempts: self.attempts,
            elapsed,
        })
    }

    fn transition(&mut self, next: PollState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal poll transition {} -> {}",
            self.state,
            next
        );
        trace!(from = %self.state, to = %next, "Poll state change");
        self.state = next;
    }
}
