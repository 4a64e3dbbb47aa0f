#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableIssue {
    pub rule: String,
    pub path: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableNode {
    pub node_id: String,
    pub ok: bool,
    /// Set when the node could not be evaluated at all.
    pub error: Option<String>,
    pub issues: Vec<RenderableIssue>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableData {
    pub nodes_scanned: u32,
    pub nodes_failed: u32,
    pub nodes_errored: u32,
    pub issues_total: u32,
    pub advisories_created: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub nodes: Vec<RenderableNode>,
    /// Ids of advisories opened by the run.
    pub advisories: Vec<String>,
    pub data: RenderableData,
}
