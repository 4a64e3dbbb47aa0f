//! Rule patterns supplied as data.
//!
//! A pattern is compiled once per node evaluation and kept as compiled-or-error,
//! so one bad pattern turns into an issue instead of aborting the scan.

use regex::Regex;

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl CompiledPattern {
    pub fn compile(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Regex::new(source),
        }
    }

    pub fn compile_all(sources: &[String]) -> Vec<CompiledPattern> {
        sources.iter().map(|s| CompiledPattern::compile(s)).collect()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Whether the pattern matches anywhere in `content`, or why it could not be compiled.
    pub fn is_match(&self, content: &str) -> Result<bool, &regex::Error> {
        self.compiled.as_ref().map(|re| re.is_match(content))
    }
}
