//! The `approve` use case: accept current file contents as the node's baseline.

use crate::context::GuardianContext;
use guardian_domain::BaselineApprover;
use std::collections::BTreeMap;

/// Approve `node_id` and return its resulting baseline (path -> sha256 hex).
pub fn approve_baseline(
    ctx: &GuardianContext,
    node_id: &str,
) -> anyhow::Result<BTreeMap<String, String>> {
    let approver = BaselineApprover::new(&ctx.storage.nodes, &ctx.storage.files, ctx.normalizer());
    Ok(approver.approve(node_id)?)
}
