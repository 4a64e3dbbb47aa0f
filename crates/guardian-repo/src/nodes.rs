use crate::json::{self, KeyedLocks};
use camino::{Utf8Path, Utf8PathBuf};
use guardian_domain::{NodeRegistry, StoreError};
use guardian_types::Node;
use std::sync::PoisonError;
use tracing::debug;

const KIND: &str = "node";

/// Node records stored as `<dir>/<id>.json`.
#[derive(Debug)]
pub struct JsonNodeRegistry {
    dir: Utf8PathBuf,
    locks: KeyedLocks,
}

impl JsonNodeRegistry {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: KeyedLocks::default(),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

impl NodeRegistry for JsonNodeRegistry {
    /// Nodes in file-name order. A file without an `id` takes its file stem.
    fn list_nodes(&self) -> Result<Vec<Node>, StoreError> {
        let mut nodes = Vec::new();
        for path in json::list_records(&self.dir)? {
            let stem = path.file_stem().unwrap_or_default().to_string();
            let mut node: Node = json::read_record(KIND, &stem, &path)?;
            if node.id.is_empty() {
                node.id = stem;
            }
            nodes.push(node);
        }
        debug!(dir = %self.dir, nodes = nodes.len(), "nodes listed");
        Ok(nodes)
    }

    fn get_node(&self, id: &str) -> Result<Node, StoreError> {
        json::validate_id(KIND, id)?;
        let mut node: Node = json::read_record(KIND, id, &json::record_path(&self.dir, id))?;
        if node.id.is_empty() {
            node.id = id.to_string();
        }
        Ok(node)
    }

    fn save_node(&self, id: &str, node: &Node) -> Result<(), StoreError> {
        json::validate_id(KIND, id)?;
        let lock = self.locks.get(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        json::write_atomic(&json::record_path(&self.dir, id), node)?;
        debug!(node_id = id, "node saved");
        Ok(())
    }
}
