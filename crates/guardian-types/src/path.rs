use crate::ids;

/// Strip the storage-root prefix from a declared path, if present.
///
/// This is the only place declared paths are canonicalized; content reads and
/// baseline lookups both go through it.
pub fn normalize<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    path.strip_prefix(prefix).unwrap_or(path)
}

/// Storage-root prefix handling bound to a configured root name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathNormalizer {
    prefix: String,
}

impl Default for PathNormalizer {
    fn default() -> Self {
        PathNormalizer::new(ids::DEFAULT_PATH_PREFIX)
    }
}

impl PathNormalizer {
    /// `prefix` may be given with or without its trailing `/`.
    pub fn new<S: AsRef<str>>(prefix: S) -> Self {
        let mut prefix = prefix.as_ref().replace('\\', "/");
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn normalize<'a>(&self, path: &'a str) -> &'a str {
        normalize(path, &self.prefix)
    }
}
