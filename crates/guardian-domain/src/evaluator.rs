use crate::digest::sha256_hex;
use crate::error::AccessError;
use crate::pattern::CompiledPattern;
use crate::ports::FileAccess;
use guardian_types::{Issue, IssueRule, Node, PathNormalizer};
use tracing::debug;

/// Evaluates one node's rules against the files it declares.
pub struct RuleEvaluator<'a> {
    files: &'a dyn FileAccess,
    normalizer: PathNormalizer,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(files: &'a dyn FileAccess, normalizer: PathNormalizer) -> Self {
        Self { files, normalizer }
    }

    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    /// Produce the ordered issue list for `node`.
    ///
    /// Order: per declared path, a `missing` issue or its forbid then require
    /// issues; then, when checksum mode is `sha256`, one drift pass over all
    /// paths. Only storage faults (escaping path, failed read) are errors.
    pub fn evaluate(&self, node: &Node) -> Result<Vec<Issue>, AccessError> {
        let forbid = CompiledPattern::compile_all(node.forbid_patterns());
        let require = CompiledPattern::compile_all(node.require_patterns());

        let mut issues = Vec::new();

        for declared in &node.paths {
            let path = self.normalizer.normalize(declared);
            if !self.files.exists(path)? {
                issues.push(Issue::missing(declared));
                continue;
            }

            let content = self.files.read_text(path)?;
            check_forbidden(declared, &content, &forbid, &mut issues);
            check_required(declared, &content, &require, &mut issues);
        }

        if node.checksum_enabled() {
            self.check_drift(node, &mut issues)?;
        }

        debug!(node_id = %node.id, issues = issues.len(), "node evaluated");
        Ok(issues)
    }

    fn check_drift(&self, node: &Node, out: &mut Vec<Issue>) -> Result<(), AccessError> {
        for declared in &node.paths {
            let path = self.normalizer.normalize(declared);
            if !self.files.exists(path)? {
                continue;
            }
            let current = sha256_hex(&self.files.read_bytes(path)?);
            if let Some(approved) = node.baseline_digest(declared, path)
                && approved != current
            {
                out.push(Issue::checksum_drift(declared));
            }
        }
        Ok(())
    }
}

fn check_forbidden(declared: &str, content: &str, patterns: &[CompiledPattern], out: &mut Vec<Issue>) {
    for pattern in patterns {
        match pattern.is_match(content) {
            Ok(true) => out.push(Issue::forbidden(declared, pattern.source())),
            Ok(false) => {}
            Err(_) => out.push(Issue::invalid_pattern(
                IssueRule::Forbid,
                declared,
                pattern.source(),
            )),
        }
    }
}

fn check_required(declared: &str, content: &str, patterns: &[CompiledPattern], out: &mut Vec<Issue>) {
    for pattern in patterns {
        match pattern.is_match(content) {
            Ok(true) => {}
            Ok(false) => out.push(Issue::required(declared, pattern.source())),
            Err(_) => out.push(Issue::invalid_pattern(
                IssueRule::Require,
                declared,
                pattern.source(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{node, node_with_baseline, node_with_patterns, MemoryFiles};

    fn evaluate(files: &MemoryFiles, node: &Node) -> Vec<Issue> {
        RuleEvaluator::new(files, PathNormalizer::default())
            .evaluate(node)
            .expect("evaluate")
    }

    #[test]
    fn empty_paths_yield_no_issues() {
        let files = MemoryFiles::default();
        let n = node_with_patterns("n0", &[], &["TODO"], &["LICENSE"]);
        assert!(evaluate(&files, &n).is_empty());
    }

    #[test]
    fn forbid_reports_once_per_pattern_not_per_occurrence() {
        let files = MemoryFiles::with(&[("x.txt", "no TODO here... wait TODO")]);
        let n = node_with_patterns("n1", &["x.txt"], &["TODO"], &[]);

        let issues = evaluate(&files, &n);
        assert_eq!(issues, vec![Issue::forbidden("x.txt", "TODO")]);
        assert_eq!(issues[0].message, "Forbidden pattern matched: TODO");
    }

    #[test]
    fn each_missing_required_pattern_is_reported() {
        let files = MemoryFiles::with(&[("doc.md", "# Title\nVersion: 2")]);
        let n = node_with_patterns("n", &["doc.md"], &[], &["LICENSE", "Version: \\d", "Author"]);

        let issues = evaluate(&files, &n);
        assert_eq!(
            issues,
            vec![
                Issue::required("doc.md", "LICENSE"),
                Issue::required("doc.md", "Author"),
            ]
        );
    }

    #[test]
    fn forbid_issues_precede_require_issues_per_path() {
        let files = MemoryFiles::with(&[("a.txt", "secret"), ("b.txt", "secret")]);
        let n = node_with_patterns("n", &["a.txt", "b.txt"], &["secret"], &["header"]);

        let rules: Vec<(String, IssueRule)> = evaluate(&files, &n)
            .into_iter()
            .map(|i| (i.path, i.rule))
            .collect();
        assert_eq!(
            rules,
            vec![
                ("a.txt".to_string(), IssueRule::Forbid),
                ("a.txt".to_string(), IssueRule::Require),
                ("b.txt".to_string(), IssueRule::Forbid),
                ("b.txt".to_string(), IssueRule::Require),
            ]
        );
    }

    #[test]
    fn invalid_patterns_become_issues_and_do_not_stop_evaluation() {
        let files = MemoryFiles::with(&[("a.txt", "TODO"), ("b.txt", "TODO")]);
        let n = node_with_patterns("n", &["a.txt", "b.txt"], &["(", "TODO"], &["["]);

        let issues = evaluate(&files, &n);
        assert_eq!(issues.len(), 6);
        assert_eq!(issues[0], Issue::invalid_pattern(IssueRule::Forbid, "a.txt", "("));
        assert_eq!(issues[1], Issue::forbidden("a.txt", "TODO"));
        assert_eq!(issues[2], Issue::invalid_pattern(IssueRule::Require, "a.txt", "["));
        assert_eq!(issues[5].path, "b.txt");
    }

    #[test]
    fn missing_file_short_circuits_other_rules() {
        let files = MemoryFiles::default();
        let n = {
            let mut n = node_with_patterns("n", &["gone.txt"], &["x"], &["y"]);
            let checks = n.checks.as_mut().expect("checks");
            checks.checksum = Some("sha256".to_string());
            checks
                .baseline
                .insert("gone.txt".to_string(), "abc".to_string());
            n
        };

        assert_eq!(evaluate(&files, &n), vec![Issue::missing("gone.txt")]);
    }

    #[test]
    fn prefixed_paths_resolve_but_issues_keep_declared_form() {
        let files = MemoryFiles::with(&[("docs/a.md", "TODO")]);
        let n = node_with_patterns("n", &["guardian-data/docs/a.md", "guardian-data/docs/b.md"], &["TODO"], &[]);

        let issues = evaluate(&files, &n);
        assert_eq!(
            issues,
            vec![
                Issue::forbidden("guardian-data/docs/a.md", "TODO"),
                Issue::missing("guardian-data/docs/b.md"),
            ]
        );
    }

    #[test]
    fn checksum_drift_is_reported_once() {
        let files = MemoryFiles::with(&[("a.txt", "changed")]);
        let n = node_with_baseline("n", &["a.txt"], &[("a.txt", sha256_hex(b"original").as_str())]);

        assert_eq!(evaluate(&files, &n), vec![Issue::checksum_drift("a.txt")]);
    }

    #[test]
    fn matching_checksum_and_absent_baseline_are_clean() {
        let files = MemoryFiles::with(&[("a.txt", "same"), ("b.txt", "anything")]);
        let n = node_with_baseline("n", &["a.txt", "b.txt"], &[("a.txt", sha256_hex(b"same").as_str())]);

        assert!(evaluate(&files, &n).is_empty());
    }

    #[test]
    fn checksum_ignored_unless_mode_is_sha256() {
        let files = MemoryFiles::with(&[("a.txt", "changed")]);
        let mut n = node_with_baseline("n", &["a.txt"], &[("a.txt", "deadbeef")]);
        n.checks.as_mut().expect("checks").checksum = Some("git".to_string());

        assert!(evaluate(&files, &n).is_empty());
    }

    #[test]
    fn baseline_lookup_accepts_either_key_form() {
        let files = MemoryFiles::with(&[("a.txt", "v2"), ("b.txt", "v2")]);
        let n = node_with_baseline(
            "n",
            &["guardian-data/a.txt", "guardian-data/b.txt"],
            &[("a.txt", "stale"), ("guardian-data/b.txt", "stale")],
        );

        assert_eq!(
            evaluate(&files, &n),
            vec![
                Issue::checksum_drift("guardian-data/a.txt"),
                Issue::checksum_drift("guardian-data/b.txt"),
            ]
        );
    }

    #[test]
    fn drift_pass_follows_content_pass() {
        let files = MemoryFiles::with(&[("a.txt", "TODO"), ("b.txt", "fine")]);
        let mut n = node_with_baseline("n", &["a.txt", "b.txt"], &[("a.txt", "old"), ("b.txt", "old")]);
        n.checks.as_mut().expect("checks").patterns = node_with_patterns("x", &[], &["TODO"], &[])
            .checks
            .and_then(|c| c.patterns);

        let rules: Vec<IssueRule> = evaluate(&files, &n).into_iter().map(|i| i.rule).collect();
        assert_eq!(
            rules,
            vec![IssueRule::Forbid, IssueRule::Checksum, IssueRule::Checksum]
        );
    }

    #[test]
    fn duplicate_paths_are_evaluated_independently() {
        let files = MemoryFiles::with(&[("a.txt", "TODO")]);
        let n = node_with_patterns("n", &["a.txt", "a.txt"], &["TODO"], &[]);
        assert_eq!(evaluate(&files, &n).len(), 2);
    }

    #[test]
    fn node_without_checks_only_checks_existence() {
        let files = MemoryFiles::with(&[("a.txt", "anything")]);
        let n = node("n", &["a.txt", "b.txt"]);
        assert_eq!(evaluate(&files, &n), vec![Issue::missing("b.txt")]);
    }

    #[test]
    fn escaping_path_is_a_fault_not_an_issue() {
        let files = MemoryFiles::default();
        let n = node("n", &["../etc/passwd"]);
        let err = RuleEvaluator::new(&files, PathNormalizer::default())
            .evaluate(&n)
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidPath { .. }));
    }

    #[test]
    fn non_utf8_content_is_decoded_lossily() {
        let files = MemoryFiles::default();
        files.put("bin.dat", &[0xff, b'T', b'O', b'D', b'O']);
        let n = node_with_patterns("n", &["bin.dat"], &["TODO"], &[]);
        assert_eq!(evaluate(&files, &n), vec![Issue::forbidden("bin.dat", "TODO")]);
    }
}
