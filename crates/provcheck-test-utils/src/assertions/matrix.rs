//! Assertion utilities for generated matrices.

use provcheck_matrix::{ArgValue, Matrix};
use std::collections::HashSet;
use thiserror::Error;

/// Error type for matrix validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixValidationError {
    #[error("Matrix ids differ: expected {expected:?}, got {actual:?}")]
    IdsMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Parameter set '{id}' has {actual} values for {expected} argument names")]
    ArityMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate id in matrix: {0}")]
    DuplicateId(String),

    #[error("Parameter set '{id}' carries entry '{entry}' in its first argument")]
    EntryMismatch { id: String, entry: String },
}

/// Asserts that the matrix holds exactly `expected` ids, in that order.
pub fn assert_matrix_ids(matrix: &Matrix, expected: &[&str]) -> Result<(), MatrixValidationError> {
    let actual = matrix.ids();
    if actual != expected {
        return Err(MatrixValidationError::IdsMismatch {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            actual: actual.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}

/// Asserts the structural invariants of a generated matrix.
///
/// * every value tuple is as long as the argument names
/// * ids are unique
/// * the first argument carries the entry whose name is the id
pub fn assert_matrix_consistent(matrix: &Matrix) -> Result<(), MatrixValidationError> {
    let arity = matrix.argnames().len();
    let mut seen = HashSet::new();

    for set in matrix.sets() {
        if set.values().len() != arity {
            return Err(MatrixValidationError::ArityMismatch {
                id: set.id().to_string(),
                expected: arity,
                actual: set.values().len(),
            });
        }
        if !seen.insert(set.id()) {
            return Err(MatrixValidationError::DuplicateId(set.id().to_string()));
        }
        if let Some(ArgValue::Entry(entry)) = set.values().first() {
            if entry.name() != set.id() {
                return Err(MatrixValidationError::EntryMismatch {
                    id: set.id().to_string(),
                    entry: entry.name().to_string(),
                });
            }
        }
    }
    Ok(())
}
