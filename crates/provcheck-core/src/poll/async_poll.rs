//! Async flavour of the poller, sleeping on tokio timers.

use super::{Poller, Polled, Step, Tracker};
use crate::error::{PollError, TimeoutExceeded};
use crate::truthy::Truthy;
use std::convert::Infallible;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

impl<'a> Poller<'a> {
    /// Wait for an infallible async condition.
    pub async fn until_async<T, F, Fut>(self, mut condition: F) -> Result<Polled<T>, TimeoutExceeded<T>>
    where
        T: Truthy + Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        let result = self
            .try_until_async(|| {
                let fut = condition();
                async move { Ok::<T, Infallible>(fut.await) }
            })
            .await;

        match result {
            Ok(polled) => Ok(polled),
            Err(PollError::Timeout(timeout)) => Err(timeout),
            Err(PollError::Condition { source, .. }) => match source {},
        }
    }

    /// Wait for a fallible async condition, with the same error rules as
    /// [`try_until`](Poller::try_until).
    pub async fn try_until_async<T, E, F, Fut>(
        mut self,
        mut condition: F,
    ) -> Result<Polled<T>, PollError<T, E>>
    where
        T: Truthy + Debug,
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut tracker = Tracker::new(self.describe(), self.timeout, self.handle_errors);
        let start = Instant::now();
        tracker.begin(self.delay);

        loop {
            let outcome = condition().await;
            match tracker.observe(outcome, start.elapsed()) {
                Step::Finished(result) => return result,
                Step::Retry => {
                    sleep(tracker.pause(self.delay, start.elapsed())).await;
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
}

/// Async counterpart of [`poll`](super::poll).
pub async fn poll_async<T, F, Fut>(
    condition: F,
    timeout: Duration,
    delay: Duration,
    fail_func: Option<&mut dyn FnMut()>,
    message: Option<&str>,
) -> Result<Polled<T>, TimeoutExceeded<T>>
where
    T: Truthy + Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
{
    let mut poller = Poller::new(timeout).delay(delay);
    if let Some(fail_func) = fail_func {
        poller = poller.fail_func(move || fail_func());
    }
    if let Some(message) = message {
        poller = poller.message(message);
    }
    poller.until_async(condition).await
}
