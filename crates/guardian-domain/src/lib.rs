//! Compliance evaluation core.
//!
//! Input: nodes and file contents, reached only through the collaborator traits in [`ports`].
//! Output: issues, per-node outcomes, advisories, and approved baselines.

#![forbid(unsafe_code)]

pub mod digest;
pub mod error;
pub mod pattern;
pub mod ports;

mod baseline;
mod evaluator;
mod runner;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use baseline::{approved_checks, BaselineApprover};
pub use error::{AccessError, GuardianError, StoreError};
pub use evaluator::RuleEvaluator;
pub use ports::{AdvisoryStore, FileAccess, NodeRegistry};
pub use runner::{ComplianceRunner, RunOutcome};
