use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use guardian_domain::{AccessError, FileAccess};
use std::io;

/// Read-only file access confined to a storage root.
#[derive(Clone, Debug)]
pub struct FsFiles {
    root: Utf8PathBuf,
}

impl FsFiles {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Resolve `path` below the root by a lexical walk of its components.
    ///
    /// Absolute paths and `..` segments that climb above the root are rejected.
    /// Symlinks are not followed during resolution.
    pub fn resolve(&self, path: &str) -> Result<Utf8PathBuf, AccessError> {
        let unified = path.replace('\\', "/");
        let mut parts: Vec<&str> = Vec::new();

        for component in Utf8Path::new(&unified).components() {
            match component {
                Utf8Component::Prefix(_) | Utf8Component::RootDir => {
                    return Err(invalid(path, "absolute paths are not allowed"));
                }
                Utf8Component::CurDir => {}
                Utf8Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(invalid(path, "escapes storage root"));
                    }
                }
                Utf8Component::Normal(part) => {
                    if cfg!(windows) && part.contains(':') {
                        return Err(invalid(path, "drive or stream prefixes are not allowed"));
                    }
                    parts.push(part);
                }
            }
        }

        if parts.is_empty() {
            return Err(invalid(path, "empty path"));
        }

        let mut resolved = self.root.clone();
        resolved.extend(parts);
        Ok(resolved)
    }
}

impl FileAccess for FsFiles {
    fn exists(&self, path: &str) -> Result<bool, AccessError> {
        let target = self.resolve(path)?;
        match std::fs::metadata(&target) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AccessError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AccessError> {
        let target = self.resolve(path)?;
        std::fs::read(&target).map_err(|source| AccessError::Io {
            path: path.to_string(),
            source,
        })
    }
}

fn invalid(path: &str, reason: &'static str) -> AccessError {
    AccessError::InvalidPath {
        path: path.to_string(),
        reason,
    }
}
