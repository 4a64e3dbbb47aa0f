//! Collaborator interfaces the core consumes.
//!
//! Implementations live in `guardian-repo` (filesystem + JSON) and in the
//! in-memory test support of this crate.

use crate::error::{AccessError, StoreError};
use guardian_types::{Advisory, Node};

pub trait NodeRegistry: Send + Sync {
    fn list_nodes(&self) -> Result<Vec<Node>, StoreError>;

    /// Returns [`StoreError::NotFound`] when no node has this id.
    fn get_node(&self, id: &str) -> Result<Node, StoreError>;

    fn save_node(&self, id: &str, node: &Node) -> Result<(), StoreError>;
}

/// Read access to files under a fixed storage root.
///
/// Every `path` is relative to that root. A path that would resolve outside the
/// root is rejected with [`AccessError::InvalidPath`].
pub trait FileAccess: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool, AccessError>;

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AccessError>;

    /// Decoded text; invalid UTF-8 sequences become U+FFFD and nothing else changes.
    fn read_text(&self, path: &str) -> Result<String, AccessError> {
        let bytes = self.read_bytes(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub trait AdvisoryStore: Send + Sync {
    /// Persist a new advisory. Returns [`StoreError::Conflict`] if the id is taken.
    fn create_advisory(&self, advisory: &Advisory) -> Result<(), StoreError>;
}
