//! Run a test body once per parameter set of a [`Matrix`].

use crate::error::RunError;
use crate::generator::{Args, Matrix};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Result of one parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    /// The body returned an error or panicked
    Failed(String),
}

impl CaseOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CaseOutcome::Failed(_))
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseOutcome::Passed => write!(f, "PASSED"),
            CaseOutcome::Failed(reason) => write!(f, "FAILED: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub id: String,
    pub outcome: CaseOutcome,
    pub duration: Duration,
}

/// Overall status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed,
    /// The matrix was empty: no applicable targets
    Skipped,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub name: String,
    pub cases: Vec<CaseReport>,
}

impl RunSummary {
    pub fn status(&self) -> RunStatus {
        if self.cases.is_empty() {
            RunStatus::Skipped
        } else if self.cases.iter().any(|c| c.outcome.is_failed()) {
            RunStatus::Failed
        } else {
            RunStatus::Passed
        }
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| !c.outcome.is_failed()).count()
    }

    pub fn failed_ids(&self) -> Vec<String> {
        self.cases
            .iter()
            .filter(|c| c.outcome.is_failed())
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn outcome(&self, id: &str) -> Option<&CaseOutcome> {
        self.cases.iter().find(|c| c.id == id).map(|c| &c.outcome)
    }

    /// `Ok` when nothing failed; a skipped run is not a failure
    pub fn into_result(self) -> Result<(), RunError> {
        let failed = self.failed_ids();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(RunError::CasesFailed {
                name: self.name,
                total: self.cases.len(),
                failed,
            })
        }
    }
}

/// Executes a test body for every parameter set, in matrix order.
///
/// Each case is isolated: an error or panic in one set is recorded and the
/// run moves on to the next.
#[derive(Debug, Clone)]
pub struct MatrixRunner {
    name: String,
}

impl MatrixRunner {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn run<F>(&self, matrix: &Matrix, mut body: F) -> RunSummary
    where
        F: FnMut(&Args<'_>) -> anyhow::Result<()>,
    {
        if matrix.is_empty() {
            warn!(test = %self.name, "Skipped: no applicable targets");
            return RunSummary {
                name: self.name.clone(),
                cases: Vec::new(),
            };
        }

        let mut cases = Vec::with_capacity(matrix.len());
        for args in matrix.iter() {
            let started = Instant::now();
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| body(&args))) {
                Ok(Ok(())) => CaseOutcome::Passed,
                Ok(Err(err)) => CaseOutcome::Failed(format!("{:#}", err)),
                Err(payload) => CaseOutcome::Failed(format!("panicked: {}", panic_message(&*payload))),
            };
            let duration = started.elapsed();

            match &outcome {
                CaseOutcome::Passed => info!(test = %self.name, id = %args.id(), ?duration, "PASSED"),
                CaseOutcome::Failed(reason) => {
                    error!(test = %self.name, id = %args.id(), ?duration, "FAILED: {}", reason)
                }
            }
            cases.push(CaseReport {
                id: args.id().to_string(),
                outcome,
                duration,
            });
        }

        RunSummary {
            name: self.name.clone(),
            cases,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
