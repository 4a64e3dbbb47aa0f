use crate::{Advisory, Issue};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for guardian scan reports.
pub const SCHEMA_SCAN_V1: &str = "guardian.scan.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Outcome of evaluating one node during a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeResult {
    pub node_id: String,
    pub ok: bool,
    pub issues: Vec<Issue>,

    /// Set when the node could not be evaluated, or its advisory could not be stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanData {
    pub nodes_scanned: u32,
    pub nodes_failed: u32,
    pub nodes_errored: u32,
    pub issues_total: u32,
    pub advisories_created: u32,
}

impl ScanData {
    pub fn from_results(results: &[NodeResult], advisories: &[Advisory]) -> Self {
        Self {
            nodes_scanned: results.len() as u32,
            nodes_failed: results.iter().filter(|r| !r.ok).count() as u32,
            nodes_errored: results.iter().filter(|r| r.error.is_some()).count() as u32,
            issues_total: results.iter().map(|r| r.issues.len() as u32).sum(),
            advisories_created: advisories.len() as u32,
        }
    }
}

/// Report envelope for one `check` run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub results: Vec<NodeResult>,
    /// Advisories created by this run.
    pub advisories: Vec<Advisory>,
    pub data: ScanData,
}
