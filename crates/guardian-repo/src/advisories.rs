use crate::json::{self, KeyedLocks};
use camino::{Utf8Path, Utf8PathBuf};
use guardian_domain::{AdvisoryStore, StoreError};
use guardian_types::{Advisory, AdvisoryState};
use serde_json::Value as JsonValue;
use std::sync::PoisonError;
use tracing::{debug, info};

const KIND: &str = "advisory";

/// Advisory records stored as `<dir>/<id>.json`.
#[derive(Debug)]
pub struct JsonAdvisoryStore {
    dir: Utf8PathBuf,
    locks: KeyedLocks,
}

impl JsonAdvisoryStore {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: KeyedLocks::default(),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// All advisories, oldest first; ties broken by id.
    pub fn list_advisories(&self) -> Result<Vec<Advisory>, StoreError> {
        let mut out = Vec::new();
        for path in json::list_records(&self.dir)? {
            let stem = path.file_stem().unwrap_or_default();
            out.push(json::read_record::<Advisory>(KIND, stem, &path)?);
        }
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    pub fn get_advisory(&self, id: &str) -> Result<Advisory, StoreError> {
        json::validate_id(KIND, id)?;
        json::read_record(KIND, id, &json::record_path(&self.dir, id))
    }

    /// Move an advisory to `state`. Any state may move to any other; only `state` is rewritten.
    pub fn set_advisory_state(&self, id: &str, state: AdvisoryState) -> Result<Advisory, StoreError> {
        json::validate_id(KIND, id)?;
        let path = json::record_path(&self.dir, id);
        let lock = self.locks.get(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut raw: JsonValue = json::read_record(KIND, id, &path)?;
        let mut advisory: Advisory =
            serde_json::from_value(raw.clone()).map_err(|source| StoreError::Json {
                context: format!("parse {path}"),
                source,
            })?;
        let previous = advisory.state;

        if let Some(object) = raw.as_object_mut() {
            object.insert(
                "state".to_string(),
                JsonValue::String(state.as_str().to_string()),
            );
        }
        json::write_atomic(&path, &raw)?;
        advisory.state = state;

        info!(advisory_id = id, from = %previous, to = %state, "advisory state changed");
        Ok(advisory)
    }
}

impl AdvisoryStore for JsonAdvisoryStore {
    fn create_advisory(&self, advisory: &Advisory) -> Result<(), StoreError> {
        json::validate_id(KIND, &advisory.id)?;
        let path = json::record_path(&self.dir, &advisory.id);
        json::write_new(KIND, &advisory.id, &path, advisory)?;
        debug!(advisory_id = %advisory.id, "advisory written");
        Ok(())
    }
}
