use crate::{RenderableNode, RenderableReport, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Guardian compliance report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Fail => "FAIL",
    };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Nodes: {} scanned, {} failed, {} errored\n- Issues: {}\n- Advisories opened: {}\n\n",
        verdict, d.nodes_scanned, d.nodes_failed, d.nodes_errored, d.issues_total, d.advisories_created
    ));

    let failing: Vec<&RenderableNode> = report.nodes.iter().filter(|n| !n.ok).collect();
    if failing.is_empty() {
        out.push_str("All nodes compliant.\n");
        return out;
    }

    out.push_str("## Failing nodes\n\n");
    for node in failing {
        out.push_str(&format!("### `{}`\n\n", node.node_id));
        if let Some(error) = &node.error {
            out.push_str(&format!("- could not be evaluated: {}\n", error));
        }
        for issue in &node.issues {
            out.push_str(&format!(
                "- [{}] `{}`: {}\n",
                issue.rule, issue.path, issue.message
            ));
        }
        out.push('\n');
    }

    if !report.advisories.is_empty() {
        out.push_str("## Advisories\n\n");
        for id in &report.advisories {
            out.push_str(&format!("- `{}`\n", id));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableData, RenderableIssue};

    #[test]
    fn renders_passing_report() {
        let report = RenderableReport {
            verdict: RenderableVerdict::Pass,
            nodes: vec![RenderableNode {
                node_id: "docs".to_string(),
                ok: true,
                error: None,
                issues: Vec::new(),
            }],
            advisories: Vec::new(),
            data: RenderableData {
                nodes_scanned: 1,
                ..RenderableData::default()
            },
        };
        let md = render_markdown(&report);
        assert!(md.contains("Verdict: **PASS**"));
        assert!(md.contains("1 scanned, 0 failed, 0 errored"));
        assert!(md.ends_with("All nodes compliant.\n"));
    }

    #[test]
    fn renders_failing_report() {
        let report = RenderableReport {
            verdict: RenderableVerdict::Fail,
            nodes: vec![
                RenderableNode {
                    node_id: "docs".to_string(),
                    ok: false,
                    error: None,
                    issues: vec![RenderableIssue {
                        rule: "checksum".to_string(),
                        path: "docs/a.md".to_string(),
                        message: "Checksum changed from baseline".to_string(),
                    }],
                },
                RenderableNode {
                    node_id: "ok".to_string(),
                    ok: true,
                    error: None,
                    issues: Vec::new(),
                },
                RenderableNode {
                    node_id: "broken".to_string(),
                    ok: false,
                    error: Some("invalid path '../x': escapes storage root".to_string()),
                    issues: Vec::new(),
                },
            ],
            advisories: vec!["docs-1700000000000".to_string()],
            data: RenderableData {
                nodes_scanned: 3,
                nodes_failed: 2,
                nodes_errored: 1,
                issues_total: 1,
                advisories_created: 1,
            },
        };

        insta::assert_snapshot!(render_markdown(&report), @r"
        # Guardian compliance report

        - Verdict: **FAIL**
        - Nodes: 3 scanned, 2 failed, 1 errored
        - Issues: 1
        - Advisories opened: 1

        ## Failing nodes

        ### `docs`

        - [checksum] `docs/a.md`: Checksum changed from baseline

        ### `broken`

        - could not be evaluated: invalid path '../x': escapes storage root

        ## Advisories

        - `docs-1700000000000`
        ");
    }
}
