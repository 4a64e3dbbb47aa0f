//! The `evaluate` use case: dry-run one node without opening an advisory.

use crate::context::GuardianContext;
use guardian_domain::{GuardianError, NodeRegistry};
use guardian_types::Issue;
use serde_json::json;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluateOutput {
    pub node_id: String,
    pub issues: Vec<Issue>,
}

impl EvaluateOutput {
    pub fn ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "nodeId": self.node_id,
            "ok": self.ok(),
            "issues": self.issues,
        })
    }
}

pub fn evaluate_node(ctx: &GuardianContext, node_id: &str) -> anyhow::Result<EvaluateOutput> {
    let node = ctx.storage.nodes.get_node(node_id).map_err(|source| {
        if source.is_not_found() {
            GuardianError::NodeNotFound {
                id: node_id.to_string(),
            }
        } else {
            GuardianError::LoadNode {
                id: node_id.to_string(),
                source,
            }
        }
    })?;

    let issues = ctx
        .evaluator()
        .evaluate(&node)
        .map_err(|source| GuardianError::Files {
            id: node_id.to_string(),
            source,
        })?;

    Ok(EvaluateOutput {
        node_id: node.id,
        issues,
    })
}
