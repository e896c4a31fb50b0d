use crate::path::{Miss, Path};
use serde_json::Value;
use std::fmt;

/// A condition an entry's data must meet to join a matrix
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRequirement {
    /// The path must resolve
    Exists(Path),
    /// The path must resolve to exactly this value
    Equals(Path, Value),
}

impl FieldRequirement {
    pub fn exists(path: impl Into<Path>) -> Self {
        FieldRequirement::Exists(path.into())
    }

    pub fn equals(path: impl Into<Path>, expected: impl Into<Value>) -> Self {
        FieldRequirement::Equals(path.into(), expected.into())
    }

    pub fn path(&self) -> &Path {
        match self {
            FieldRequirement::Exists(path) | FieldRequirement::Equals(path, _) => path,
        }
    }

    /// Check `data` against this requirement
    pub fn check(&self, data: &Value) -> Result<(), Unmet> {
        let found = self.path().lookup(data).map_err(Unmet::Lookup)?;
        match self {
            FieldRequirement::Exists(_) => Ok(()),
            FieldRequirement::Equals(_, expected) if found == expected => Ok(()),
            FieldRequirement::Equals(_, expected) => Err(Unmet::Mismatch {
                expected: expected.clone(),
                actual: found.clone(),
            }),
        }
    }

    pub fn is_met_by(&self, data: &Value) -> bool {
        self.check(data).is_ok()
    }
}

impl fmt::Display for FieldRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRequirement::Exists(path) => write!(f, "{}", path),
            FieldRequirement::Equals(path, expected) => write!(f, "{} == {}", path, expected),
        }
    }
}

/// Why a requirement was not met. Only ever logged: an unmet requirement
/// excludes the entry, it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Unmet {
    Lookup(Miss),
    Mismatch { expected: Value, actual: Value },
}

impl fmt::Display for Unmet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unmet::Lookup(miss) => write!(f, "{} at segment {}", miss.reason, miss.depth),
            Unmet::Mismatch { expected, actual } => {
                write!(f, "expected {}, found {}", expected, actual)
            }
        }
    }
}
