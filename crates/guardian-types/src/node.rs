use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// A governed artifact: a named set of file paths plus the rules they must satisfy.
///
/// Fields the engine does not interpret (display name, type, agent, status, ...)
/// are carried in `extra` so a read-modify-write cycle leaves them untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    /// Falls back to the record's file stem when absent.
    #[serde(default)]
    pub id: String,

    /// Paths relative to the storage root, optionally prefixed with the root's name.
    #[serde(default, deserialize_with = "crate::lenient::string_list")]
    pub paths: Vec<String>,

    #[serde(
        default,
        deserialize_with = "crate::lenient::optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub checks: Option<NodeChecks>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeChecks {
    /// Checksum mode. Drift detection runs only when this is exactly `sha256`.
    #[serde(
        default,
        deserialize_with = "crate::lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub checksum: Option<String>,

    /// Approved digests keyed by path (as declared, or normalized).
    #[serde(default, deserialize_with = "crate::lenient::string_map")]
    pub baseline: BTreeMap<String, String>,

    #[serde(
        default,
        deserialize_with = "crate::lenient::optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub patterns: Option<PatternRules>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatternRules {
    /// Regular expressions that must not match anywhere in a file.
    #[serde(
        default,
        deserialize_with = "crate::lenient::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub forbid: Vec<String>,

    /// Regular expressions that must each match somewhere in a file.
    #[serde(
        default,
        deserialize_with = "crate::lenient::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub require: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Node {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn forbid_patterns(&self) -> &[String] {
        self.patterns().map(|p| p.forbid.as_slice()).unwrap_or(&[])
    }

    pub fn require_patterns(&self) -> &[String] {
        self.patterns().map(|p| p.require.as_slice()).unwrap_or(&[])
    }

    pub fn checksum_enabled(&self) -> bool {
        self.checks
            .as_ref()
            .is_some_and(NodeChecks::checksum_enabled)
    }

    /// Approved digest for `declared`, falling back to its normalized form.
    pub fn baseline_digest(&self, declared: &str, normalized: &str) -> Option<&str> {
        let baseline = &self.checks.as_ref()?.baseline;
        baseline
            .get(declared)
            .or_else(|| baseline.get(normalized))
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }

    fn patterns(&self) -> Option<&PatternRules> {
        self.checks.as_ref()?.patterns.as_ref()
    }
}

impl NodeChecks {
    pub fn checksum_enabled(&self) -> bool {
        self.checksum.as_deref() == Some(ids::CHECKSUM_SHA256)
    }
}
