use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueRule {
    Missing,
    Forbid,
    Require,
    Checksum,
}

impl IssueRule {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueRule::Missing => ids::RULE_MISSING,
            IssueRule::Forbid => ids::RULE_FORBID,
            IssueRule::Require => ids::RULE_REQUIRE,
            IssueRule::Checksum => ids::RULE_CHECKSUM,
        }
    }
}

impl fmt::Display for IssueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected violation. `path` is the path exactly as declared on the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    pub path: String,
    pub rule: IssueRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn missing(path: &str) -> Self {
        Self {
            path: path.to_string(),
            rule: IssueRule::Missing,
            pattern: None,
            message: "File not found".to_string(),
        }
    }

    pub fn forbidden(path: &str, pattern: &str) -> Self {
        Self {
            path: path.to_string(),
            rule: IssueRule::Forbid,
            pattern: Some(pattern.to_string()),
            message: format!("Forbidden pattern matched: {pattern}"),
        }
    }

    pub fn required(path: &str, pattern: &str) -> Self {
        Self {
            path: path.to_string(),
            rule: IssueRule::Require,
            pattern: Some(pattern.to_string()),
            message: format!("Required pattern not found: {pattern}"),
        }
    }

    /// A pattern that failed to compile, reported under the rule that declared it.
    pub fn invalid_pattern(rule: IssueRule, path: &str, pattern: &str) -> Self {
        Self {
            path: path.to_string(),
            rule,
            pattern: Some(pattern.to_string()),
            message: format!("Invalid regex: {pattern}"),
        }
    }

    pub fn checksum_drift(path: &str) -> Self {
        Self {
            path: path.to_string(),
            rule: IssueRule::Checksum,
            pattern: None,
            message: "Checksum changed from baseline".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryState {
    #[default]
    Open,
    Acknowledged,
    Approved,
    Rejected,
}

impl AdvisoryState {
    pub const ALL: [AdvisoryState; 4] = [
        AdvisoryState::Open,
        AdvisoryState::Acknowledged,
        AdvisoryState::Approved,
        AdvisoryState::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdvisoryState::Open => "open",
            AdvisoryState::Acknowledged => "acknowledged",
            AdvisoryState::Approved => "approved",
            AdvisoryState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AdvisoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown advisory state: {0} (expected open|acknowledged|approved|rejected)")]
pub struct ParseStateError(pub String);

impl FromStr for AdvisoryState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdvisoryState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}

/// Durable record of one failed scan of one node.
///
/// Everything except `state` is a snapshot taken at creation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub id: String,
    pub node_id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub state: AdvisoryState,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Advisory {
    /// Open a new advisory for `node_id` with the given issue snapshot.
    pub fn open(id: String, node_id: &str, created_at: OffsetDateTime, issues: Vec<Issue>) -> Self {
        Self {
            id,
            node_id: node_id.to_string(),
            created_at,
            state: AdvisoryState::Open,
            issues,
        }
    }
}
