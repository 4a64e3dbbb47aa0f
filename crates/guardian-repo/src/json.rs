use camino::{Utf8Path, Utf8PathBuf};
use guardian_domain::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Per-record mutexes so writers of the same record never interleave.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    locks: Mutex<BTreeMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub(crate) fn get(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }
}

/// Record ids double as file names and must be a single path component.
pub(crate) fn validate_id(kind: &'static str, id: &str) -> Result<(), StoreError> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', ':'])
        || id.chars().any(char::is_control);
    if bad {
        return Err(StoreError::InvalidId {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn record_path(dir: &Utf8Path, id: &str) -> Utf8PathBuf {
    dir.join(format!("{id}.json"))
}

/// Read and parse one record. A missing file is `NotFound`.
pub(crate) fn read_record<T: DeserializeOwned>(
    kind: &'static str,
    id: &str,
    path: &Utf8Path,
) -> Result<T, StoreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
        Err(source) => {
            return Err(StoreError::Io {
                context: format!("read {path}"),
                source,
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        context: format!("parse {path}"),
        source,
    })
}

/// Every `*.json` file directly inside `dir`, sorted by file name.
/// A directory that does not exist yet holds no records.
pub(crate) fn list_records(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, StoreError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| StoreError::Io {
            context: format!("list {dir}"),
            source: err.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.ends_with(".json") {
            out.push(dir.join(name));
        }
    }
    Ok(out)
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
pub(crate) fn write_atomic<T: Serialize>(path: &Utf8Path, value: &T) -> Result<(), StoreError> {
    let tmp = write_temp(path, value)?;
    tmp.persist(path).map_err(|err| StoreError::Io {
        context: format!("replace {path}"),
        source: err.error,
    })?;
    Ok(())
}

/// Like [`write_atomic`], but fails with `Conflict` when `path` already exists.
pub(crate) fn write_new<T: Serialize>(
    kind: &'static str,
    id: &str,
    path: &Utf8Path,
    value: &T,
) -> Result<(), StoreError> {
    let tmp = write_temp(path, value)?;
    tmp.persist_noclobber(path).map_err(|err| {
        if err.error.kind() == io::ErrorKind::AlreadyExists {
            StoreError::Conflict {
                kind,
                id: id.to_string(),
            }
        } else {
            StoreError::Io {
                context: format!("create {path}"),
                source: err.error,
            }
        }
    })?;
    Ok(())
}

fn write_temp<T: Serialize>(path: &Utf8Path, value: &T) -> Result<NamedTempFile, StoreError> {
    let dir = path.parent().unwrap_or(Utf8Path::new("."));
    std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        context: format!("create {dir}"),
        source,
    })?;

    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        context: format!("serialize {path}"),
        source,
    })?;
    bytes.push(b'\n');

    let io_err = |source: io::Error| StoreError::Io {
        context: format!("write {path}"),
        source,
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_single_components() {
        for id in ["n1", "theme-tokens", "n1-1700000000123-2", "a.b"] {
            assert!(validate_id("node", id).is_ok(), "{id} should be valid");
        }
        for id in ["", ".", "..", "a/b", "a\\b", "../x", "c:x", "a\nb"] {
            assert!(
                matches!(validate_id("node", id), Err(StoreError::InvalidId { .. })),
                "{id:?} should be invalid"
            );
        }
    }
}
