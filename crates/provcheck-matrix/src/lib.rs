//! # Provider matrices
//!
//! Builds parametrized test matrices from provider test data: a pool of
//! named provider entries is filtered by required fields, optionally by a
//! caller-supplied predicate, and turned into one parameter set per
//! applicable provider.
//!
//! ## Example
//!
//! ```
//! use provcheck_matrix::{FieldRequirement, MatrixGenerator, TestData};
//!
//! let data = TestData::from_yaml_str(r#"
//! providers:
//!   vsphere:
//!     type: virtualcenter
//!     provisioning: {host: esx-01, iso_kickstart: rhel}
//!   rhv:
//!     type: rhevm
//!     provisioning: {host: rhv-01}
//! "#).unwrap();
//!
//! let matrix = MatrixGenerator::new()
//!     .require(FieldRequirement::exists(["provisioning", "iso_kickstart"]))
//!     .generate(data.providers());
//!
//! assert_eq!(matrix.ids(), vec!["vsphere"]);
//! ```

#![forbid(unsafe_code)]

mod error;

pub mod data;
pub mod entry;
pub mod generator;
pub mod path;
pub mod requirement;
pub mod runner;

pub use data::TestData;
pub use entry::{ConfigEntry, ProviderClass};
pub use error::{DataError, PathError, RunError};
pub use generator::{generate, ArgValue, Args, Matrix, MatrixGenerator, ParameterSet, Selector};
pub use path::{Miss, MissReason, Path, Segment};
pub use requirement::{FieldRequirement, Unmet};
pub use runner::{CaseOutcome, CaseReport, MatrixRunner, RunStatus, RunSummary};

/// Returns the version of this crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
