//! Fuzz target for rule evaluation with arbitrary patterns and content.
//!
//! Goal: evaluation **never panics**. Invalid patterns must surface as issues.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use guardian_domain::{AccessError, FileAccess, RuleEvaluator};
use guardian_types::{Node, NodeChecks, PathNormalizer, PatternRules};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct EvalInput {
    content: Vec<u8>,
    forbid: Vec<String>,
    require: Vec<String>,
    baseline: Option<String>,
}

/// A storage root holding exactly one file, `f.txt`.
struct OneFile(Vec<u8>);

impl FileAccess for OneFile {
    fn exists(&self, path: &str) -> Result<bool, AccessError> {
        Ok(path == "f.txt")
    }

    fn read_bytes(&self, _path: &str) -> Result<Vec<u8>, AccessError> {
        Ok(self.0.clone())
    }
}

fuzz_target!(|input: EvalInput| {
    if input.content.len() > 16 * 1024
        || input.forbid.len() + input.require.len() > 16
        || input.forbid.iter().chain(&input.require).any(|p| p.len() > 128)
    {
        return;
    }

    let pattern_count = input.forbid.len() + input.require.len();
    let mut node = Node::new("fuzz");
    node.paths = vec!["f.txt".to_string()];
    node.checks = Some(NodeChecks {
        checksum: input.baseline.as_ref().map(|_| "sha256".to_string()),
        baseline: input
            .baseline
            .into_iter()
            .map(|digest| ("f.txt".to_string(), digest))
            .collect(),
        patterns: Some(PatternRules {
            forbid: input.forbid,
            require: input.require,
            ..PatternRules::default()
        }),
        ..NodeChecks::default()
    });

    let files = OneFile(input.content);
    let issues = RuleEvaluator::new(&files, PathNormalizer::default())
        .evaluate(&node)
        .expect("in-memory reads never fail");
    assert!(issues.len() <= pattern_count + 1);
});
