//! Shared test utilities for the guardian workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `guardian-types` would not suffice.

use serde_json::Value;

const TIMESTAMP: &str = "__TIMESTAMP__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` when the root
///    object is a scan report envelope (`schema`, `tool`, `verdict`,
///    `results`, `advisories`).
///
/// 2. **Recursive**: `started_at`, `finished_at` and `createdAt` become
///    `"__TIMESTAMP__"` at any depth. Advisory records (objects with `id`,
///    `nodeId` and `createdAt`) get their id rewritten to `<nodeId>-__ID__`,
///    since the id embeds the creation time.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "results", "advisories"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_recursive(&mut value);
    value
}

fn normalize_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let advisory_node = match (map.get("id"), map.get("nodeId"), map.get("createdAt")) {
                (Some(Value::String(_)), Some(Value::String(node)), Some(_)) => Some(node.clone()),
                _ => None,
            };
            if let Some(node) = advisory_node {
                map.insert("id".to_string(), Value::String(format!("{node}-__ID__")));
            }
            for key in ["started_at", "finished_at", "createdAt"] {
                if let Some(v) = map.get_mut(key) {
                    *v = Value::String(TIMESTAMP.to_string());
                }
            }
            for val in map.values_mut() {
                normalize_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_and_advisories() {
        let input = json!({
            "schema": "guardian.scan.v1",
            "tool": { "name": "guardian", "version": "0.1.0" },
            "started_at": "2025-01-01T00:00:00Z",
            "finished_at": "2025-01-01T00:00:01Z",
            "verdict": "fail",
            "results": [{ "nodeId": "docs", "ok": false, "issues": [] }],
            "advisories": [{
                "id": "docs-1735689600000-2",
                "nodeId": "docs",
                "createdAt": "2025-01-01T00:00:00.5Z",
                "state": "open",
                "issues": []
            }]
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["tool"]["name"], "guardian");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
        assert_eq!(result["finished_at"], "__TIMESTAMP__");
        assert_eq!(result["advisories"][0]["id"], "docs-__ID__");
        assert_eq!(result["advisories"][0]["createdAt"], "__TIMESTAMP__");
        assert_eq!(result["results"][0]["nodeId"], "docs");
    }

    #[test]
    fn root_without_envelope_keys_keeps_version() {
        let input = json!({
            "tool": { "name": "other", "version": "2.0.0" },
            "started_at": "2025-01-01T00:00:00Z"
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "2.0.0");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
    }

    #[test]
    fn node_results_are_not_mistaken_for_advisories() {
        let input = json!({ "id": "x", "nodeId": "n" });
        let result = normalize_nondeterministic(input.clone());
        assert_eq!(result, input);
    }
}
