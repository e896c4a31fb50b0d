//! Cleanup steps registered during a test and run in reverse order.

use crate::error::TestError;
use parking_lot::Mutex;
use std::fmt;
use tracing::{debug, warn};

type Finalizer<'a> = Box<dyn FnOnce() -> anyhow::Result<()> + 'a>;

/// LIFO stack of cleanup closures.
///
/// Whatever is still registered when the stack is dropped runs at that
/// point, so cleanup also happens when the test body panics.
#[derive(Default)]
pub struct Finalizers<'a> {
    stack: Mutex<Vec<(String, Finalizer<'a>)>>,
}

impl fmt::Debug for Finalizers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finalizers")
            .field("pending", &self.len())
            .finish()
    }
}

impl<'a> Finalizers<'a> {
    pub fn new() -> Self {
        Self {
            stack: Mutex::new(Vec::new()),
        }
    }

    /// Register a cleanup step; later registrations run first
    pub fn add<F>(&self, name: impl Into<String>, finalizer: F)
    where
        F: FnOnce() -> anyhow::Result<()> + 'a,
    {
        let name = name.into();
        debug!(finalizer = %name, "Registered finalizer");
        self.stack.lock().push((name, Box::new(finalizer)));
    }

    pub fn len(&self) -> usize {
        self.stack.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every pending step, newest first.
    ///
    /// A failing step does not stop the others; all failures are reported
    /// together.
    pub fn run_all(&self) -> Result<(), TestError> {
        let mut failures = Vec::new();
        loop {
            // Pop outside the call so a finalizer may register another one
            let next = self.stack.lock().pop();
            let Some((name, finalizer)) = next else {
                break;
            };
            debug!(finalizer = %name, "Running finalizer");
            if let Err(err) = finalizer() {
                warn!(finalizer = %name, "Finalizer failed: {:#}", err);
                failures.push(format!("{}: {:#}", name, err));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(TestError::Finalizers(failures))
        }
    }
}

impl Drop for Finalizers<'_> {
    fn drop(&mut self) {
        if !self.stack.get_mut().is_empty() {
            // Failures are already logged by run_all
            let _ = self.run_all();
        }
    }
}
