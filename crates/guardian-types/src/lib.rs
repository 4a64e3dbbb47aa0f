//! Stable DTOs and IDs used across the guardian workspace.
//!
//! This crate is intentionally boring:
//! - the persisted node and advisory records
//! - the emitted scan report
//! - stable rule identifiers
//! - storage-root prefix normalization
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod advisory;
pub mod explain;
pub mod ids;
pub mod node;
pub mod path;
pub mod receipt;

mod lenient;

pub use advisory::{Advisory, AdvisoryState, Issue, IssueRule, ParseStateError};
pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use node::{Node, NodeChecks, PatternRules};
pub use path::{normalize, PathNormalizer};
pub use receipt::{NodeResult, ScanData, ScanReport, ToolMeta, Verdict, SCHEMA_SCAN_V1};
