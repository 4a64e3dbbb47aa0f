//! Render use cases: markdown and GitHub annotations from scan reports.

use guardian_render::{
    RenderableData, RenderableIssue, RenderableNode, RenderableReport, RenderableVerdict,
};
use guardian_types::{ScanReport, Verdict};

pub fn to_renderable(report: &ScanReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        nodes: report
            .results
            .iter()
            .map(|r| RenderableNode {
                node_id: r.node_id.clone(),
                ok: r.ok,
                error: r.error.clone(),
                issues: r
                    .issues
                    .iter()
                    .map(|i| RenderableIssue {
                        rule: i.rule.to_string(),
                        path: i.path.clone(),
                        message: i.message.clone(),
                    })
                    .collect(),
            })
            .collect(),
        advisories: report.advisories.iter().map(|a| a.id.clone()).collect(),
        data: RenderableData {
            nodes_scanned: report.data.nodes_scanned,
            nodes_failed: report.data.nodes_failed,
            nodes_errored: report.data.nodes_errored,
            issues_total: report.data.issues_total,
            advisories_created: report.data.advisories_created,
        },
    }
}

pub fn render_markdown(report: &ScanReport) -> String {
    guardian_render::render_markdown(&to_renderable(report))
}

pub fn render_annotations(report: &ScanReport, max: usize) -> Vec<String> {
    guardian_render::render_github_annotations(&to_renderable(report))
        .into_iter()
        .take(max)
        .collect()
}
