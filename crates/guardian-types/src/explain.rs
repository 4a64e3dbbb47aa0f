//! Explain registry for issue rules.
//!
//! Maps rule identifiers to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for an issue rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to resolve an issue.
    pub remediation: &'static str,
    /// Before/after node configuration examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration or content that produces an issue.
    pub before: &'static str,
    /// Configuration or content that passes.
    pub after: &'static str,
}

/// Look up an explanation by rule identifier.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_MISSING => Some(explain_missing()),
        ids::RULE_FORBID => Some(explain_forbid()),
        ids::RULE_REQUIRE => Some(explain_require()),
        ids::RULE_CHECKSUM => Some(explain_checksum()),
        _ => None,
    }
}

/// List all known rule identifiers.
pub fn all_rules() -> &'static [&'static str] {
    &[
        ids::RULE_MISSING,
        ids::RULE_FORBID,
        ids::RULE_REQUIRE,
        ids::RULE_CHECKSUM,
    ]
}

fn explain_missing() -> Explanation {
    Explanation {
        title: "Missing File",
        description: "\
A path declared on the node does not exist under the storage root.

Paths are resolved relative to the data directory. A leading `guardian-data/`
prefix is accepted and stripped. When a file is missing no other rule is
evaluated for that path, so forbid/require/checksum results for it are unknown.",
        remediation: "\
Restore the file, or remove the stale path from the node's `paths` list.
If the file moved, update the path and approve a new baseline.",
        examples: ExamplePair {
            before: r#"{ "id": "theme", "paths": ["themes/old-theme.json"] }"#,
            after: r#"{ "id": "theme", "paths": ["themes/guardian-theme.json"] }"#,
        },
    }
}

fn explain_forbid() -> Explanation {
    Explanation {
        title: "Forbidden Pattern",
        description: "\
File content matches a regular expression listed in `checks.patterns.forbid`.

Each pattern is reported at most once per file, no matter how many times it
matches. A pattern that is not a valid regular expression is reported under
this rule with an `Invalid regex` message; it never aborts the scan.",
        remediation: "\
Remove the matching content from the file, or narrow the pattern if it is
catching legitimate text. Fix invalid patterns in the node definition.",
        examples: ExamplePair {
            before: r#"{ "checks": { "patterns": { "forbid": ["TODO"] } } }
// docs/readme.md: "no TODO here... wait TODO""#,
            after: r#"{ "checks": { "patterns": { "forbid": ["TODO"] } } }
// docs/readme.md: "release notes complete""#,
        },
    }
}

fn explain_require() -> Explanation {
    Explanation {
        title: "Required Pattern",
        description: "\
File content does not match a regular expression listed in `checks.patterns.require`.

Every required pattern is checked independently; a file missing three
required patterns produces three issues. Invalid patterns are reported under
this rule with an `Invalid regex` message.",
        remediation: "\
Add the required content (license header, version marker, ...) to the file,
or drop the requirement from the node if it no longer applies.",
        examples: ExamplePair {
            before: r##"{ "checks": { "patterns": { "require": ["^# License"] } } }
// docs/guide.md starts with "# Guide""##,
            after: r##"{ "checks": { "patterns": { "require": ["(?m)^# License"] } } }
// docs/guide.md contains a "# License" heading"##,
        },
    }
}

fn explain_checksum() -> Explanation {
    Explanation {
        title: "Checksum Drift",
        description: "\
The SHA-256 digest of a file differs from the digest recorded in the node's
approved baseline.

Drift detection runs only when `checks.checksum` is exactly `sha256`. Paths
with no baseline entry are never reported; baseline keys may be the declared
path or its normalized form.",
        remediation: "\
Review the change. If it is intended, approve a new baseline for the node
(`guardian approve <node-id>`), which re-hashes every existing path.
Otherwise revert the file to its approved content.",
        examples: ExamplePair {
            before: r#"{ "checks": { "checksum": "sha256", "baseline": { "a.txt": "9f86d0..." } } }
// a.txt was edited after approval"#,
            after: r#"{ "checks": { "checksum": "sha256", "baseline": { "a.txt": "60303a..." } } }
// baseline re-approved after review"#,
        },
    }
}
