//! Use case orchestration for guardian.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod advisories;
mod approve;
mod check;
mod context;
mod evaluate;
mod explain;
mod render;
mod report;

#[cfg(test)]
mod test_support;

pub use advisories::{list_advisories, set_advisory_state, AdvisoryFilter};
pub use approve::approve_baseline;
pub use check::{run_check, verdict_exit_code, CheckOutput};
pub use context::{load_config, GuardianContext};
pub use evaluate::{evaluate_node, EvaluateOutput};
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use render::{render_annotations, render_markdown, to_renderable};
pub use report::{parse_report_json, serialize_report, write_report, write_text};
