use crate::RenderableReport;

/// Render a report as GitHub Actions workflow command annotations.
///
/// Issues: `::error file={path}::[{rule}] {message}`.
/// Nodes that could not be evaluated: `::warning::[{node_id}] {error}`.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for node in &report.nodes {
        if let Some(error) = &node.error {
            out.push(format!(
                "::warning::{}",
                escape_data(&format!("[{}] {}", node.node_id, error))
            ));
            continue;
        }
        for issue in &node.issues {
            out.push(format!(
                "::error file={}::{}",
                escape_property(&issue.path),
                escape_data(&format!("[{}] {}", issue.rule, issue.message))
            ));
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
