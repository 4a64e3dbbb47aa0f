use std::io;

/// Failure to resolve or read a path under the storage root.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Failure reported by a node registry or advisory store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("invalid {kind} id: '{id}'")]
    InvalidId { kind: &'static str, id: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Operation-level faults of the three core operations.
///
/// Content problems (missing files, pattern hits, invalid patterns, drift) are
/// never errors; they are returned as issues.
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    #[error("list nodes")]
    ListNodes(#[source] StoreError),

    #[error("load node {id}")]
    LoadNode {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("save node {id}")]
    SaveNode {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("read files of node {id}")]
    Files {
        id: String,
        #[source]
        source: AccessError,
    },

    #[error("create advisory for node {node_id}")]
    CreateAdvisory {
        node_id: String,
        #[source]
        source: StoreError,
    },

    #[error("no free advisory id for node {node_id} after {attempts} attempts")]
    AdvisoryIdExhausted { node_id: String, attempts: u32 },
}
