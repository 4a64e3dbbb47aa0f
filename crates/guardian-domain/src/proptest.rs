//! Property-based tests for the evaluation core.
//!
//! Covered invariants:
//! - Nodes without paths never produce issues
//! - Forbid and require issues are counted per pattern, not per occurrence
//! - Approving a baseline leaves no drift behind
//! - Path normalization is idempotent

use crate::baseline::BaselineApprover;
use crate::evaluator::RuleEvaluator;
use crate::test_support::{node, node_with_patterns, MemoryFiles, MemoryRegistry};
use guardian_types::{normalize, Issue, IssueRule, PathNormalizer};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Lowercase words; always valid regexes that match themselves literally.
fn arb_word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{3,8}").unwrap()
}

fn arb_content() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 0..12).prop_map(|words| words.join(" "))
}

fn arb_relative_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f][a-z0-9_-]{0,11}(/[a-z][a-z0-9_-]{0,11}){0,3}\\.txt").unwrap()
}

fn evaluate(files: &MemoryFiles, n: &guardian_types::Node) -> Vec<Issue> {
    RuleEvaluator::new(files, PathNormalizer::default())
        .evaluate(n)
        .expect("evaluate")
}

// ============================================================================
// Property tests: pattern rules
// ============================================================================

proptest! {
    #[test]
    fn nodes_without_paths_have_no_issues(
        forbid in prop::collection::vec(arb_word(), 0..5),
        require in prop::collection::vec(arb_word(), 0..5),
    ) {
        let forbid: Vec<&str> = forbid.iter().map(String::as_str).collect();
        let require: Vec<&str> = require.iter().map(String::as_str).collect();
        let n = node_with_patterns("n", &[], &forbid, &require);

        prop_assert!(evaluate(&MemoryFiles::default(), &n).is_empty());
    }

    #[test]
    fn one_forbid_issue_per_matching_pattern(
        content in arb_content(),
        patterns in prop::collection::vec(arb_word(), 0..6),
    ) {
        let files = MemoryFiles::with(&[("f.txt", content.as_str())]);
        let refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
        let n = node_with_patterns("n", &["f.txt"], &refs, &[]);

        let issues = evaluate(&files, &n);
        let expected = patterns.iter().filter(|p| content.contains(p.as_str())).count();

        prop_assert_eq!(issues.len(), expected);
        prop_assert!(issues.iter().all(|i| i.rule == IssueRule::Forbid));
    }

    #[test]
    fn one_require_issue_per_absent_pattern(
        content in arb_content(),
        patterns in prop::collection::vec(arb_word(), 0..6),
    ) {
        let files = MemoryFiles::with(&[("f.txt", content.as_str())]);
        let refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
        let n = node_with_patterns("n", &["f.txt"], &[], &refs);

        let issues = evaluate(&files, &n);
        let absent: Vec<&str> = patterns
            .iter()
            .map(String::as_str)
            .filter(|p| !content.contains(p))
            .collect();

        prop_assert_eq!(issues.len(), absent.len());
        for (issue, pattern) in issues.iter().zip(absent) {
            prop_assert_eq!(issue.rule, IssueRule::Require);
            prop_assert_eq!(issue.pattern.as_deref(), Some(pattern));
        }
    }
}

// ============================================================================
// Property tests: baselines and paths
// ============================================================================

proptest! {
    #[test]
    fn approve_then_evaluate_reports_no_drift(
        entries in prop::collection::btree_map(arb_relative_path(), arb_content(), 1..6),
        prefixed in any::<bool>(),
    ) {
        let files = MemoryFiles::default();
        let mut declared = Vec::new();
        for (path, content) in &entries {
            files.put(path, content.as_bytes());
            declared.push(if prefixed { format!("guardian-data/{path}") } else { path.clone() });
        }
        let refs: Vec<&str> = declared.iter().map(String::as_str).collect();
        let registry = MemoryRegistry::with(vec![node("n", &refs)]);

        let baseline = BaselineApprover::new(&registry, &files, PathNormalizer::default())
            .approve("n")
            .expect("approve");
        prop_assert_eq!(baseline.len(), entries.len());

        let approved = registry.node("n").expect("node");
        prop_assert!(evaluate(&files, &approved).is_empty());
    }

    #[test]
    fn normalization_is_idempotent(path in arb_relative_path(), prefixed in any::<bool>()) {
        let input = if prefixed { format!("guardian-data/{path}") } else { path };
        let once = normalize(&input, "guardian-data/");
        prop_assert_eq!(normalize(once, "guardian-data/"), once);
    }
}
