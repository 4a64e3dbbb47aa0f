//! Storage adapters: sandboxed file reads and JSON-file node/advisory stores.
//!
//! Layout under the data directory:
//! - `nodes/<id>.json`
//! - `advisories/<id>.json`
//! - everything else is governed content addressed by node paths

#![forbid(unsafe_code)]

mod advisories;
mod files;
mod json;
mod nodes;

use camino::{Utf8Path, Utf8PathBuf};
use guardian_types::ids;

pub use advisories::JsonAdvisoryStore;
pub use files::FsFiles;
pub use nodes::JsonNodeRegistry;

/// The three adapters bound to one data directory.
pub struct Storage {
    root: Utf8PathBuf,
    pub files: FsFiles,
    pub nodes: JsonNodeRegistry,
    pub advisories: JsonAdvisoryStore,
}

impl Storage {
    pub fn open(root: impl Into<Utf8PathBuf>) -> Self {
        let root = root.into();
        Self {
            files: FsFiles::new(root.clone()),
            nodes: JsonNodeRegistry::new(root.join(ids::NODES_DIR)),
            advisories: JsonAdvisoryStore::new(root.join(ids::ADVISORIES_DIR)),
            root,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}
