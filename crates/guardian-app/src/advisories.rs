//! Advisory listing and caller-driven state transitions.

use crate::context::GuardianContext;
use anyhow::Context;
use guardian_types::{Advisory, AdvisoryState};

#[derive(Clone, Debug, Default)]
pub struct AdvisoryFilter {
    pub state: Option<AdvisoryState>,
    pub node_id: Option<String>,
}

impl AdvisoryFilter {
    fn matches(&self, advisory: &Advisory) -> bool {
        self.state.is_none_or(|s| advisory.state == s)
            && self
                .node_id
                .as_deref()
                .is_none_or(|id| advisory.node_id == id)
    }
}

/// Advisories matching `filter`, oldest first.
pub fn list_advisories(ctx: &GuardianContext, filter: &AdvisoryFilter) -> anyhow::Result<Vec<Advisory>> {
    let all = ctx
        .storage
        .advisories
        .list_advisories()
        .context("list advisories")?;
    Ok(all.into_iter().filter(|a| filter.matches(a)).collect())
}

pub fn set_advisory_state(
    ctx: &GuardianContext,
    id: &str,
    state: AdvisoryState,
) -> anyhow::Result<Advisory> {
    ctx.storage
        .advisories
        .set_advisory_state(id, state)
        .with_context(|| format!("set state of advisory {id}"))
}
