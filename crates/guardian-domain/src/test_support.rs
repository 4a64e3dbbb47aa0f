use crate::error::{AccessError, StoreError};
use crate::ports::{AdvisoryStore, FileAccess, NodeRegistry};
use guardian_types::{Advisory, Node, NodeChecks, PatternRules};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// In-memory storage root. Paths containing `..` are treated as escaping.
#[derive(Default)]
pub struct MemoryFiles {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    unreadable: BTreeSet<String>,
}

impl MemoryFiles {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        let files = MemoryFiles::default();
        for (path, content) in entries {
            files.put(path, content.as_bytes());
        }
        files
    }

    pub fn put(&self, path: &str, content: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_vec());
    }

    /// Mark a path as present but failing every read.
    pub fn unreadable(mut self, path: &str) -> Self {
        self.put(path, b"");
        self.unreadable.insert(path.to_string());
        self
    }

    fn check(&self, path: &str) -> Result<(), AccessError> {
        if path.split('/').any(|seg| seg == "..") {
            return Err(AccessError::InvalidPath {
                path: path.to_string(),
                reason: "escapes storage root",
            });
        }
        Ok(())
    }
}

impl FileAccess for MemoryFiles {
    fn exists(&self, path: &str) -> Result<bool, AccessError> {
        self.check(path)?;
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AccessError> {
        self.check(path)?;
        if self.unreadable.contains(path) {
            return Err(AccessError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AccessError::Io {
                path: path.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

#[derive(Default)]
pub struct MemoryRegistry {
    nodes: Mutex<BTreeMap<String, Node>>,
    pub saves: Mutex<u32>,
    pub fail_list: bool,
}

impl MemoryRegistry {
    pub fn with(nodes: Vec<Node>) -> Self {
        let registry = MemoryRegistry::default();
        for node in nodes {
            registry
                .nodes
                .lock()
                .unwrap()
                .insert(node.id.clone(), node);
        }
        registry
    }

    /// A registry whose node listing always fails.
    pub fn failing() -> Self {
        MemoryRegistry {
            fail_list: true,
            ..MemoryRegistry::default()
        }
    }

    pub fn node(&self, id: &str) -> Option<Node> {
        self.nodes.lock().unwrap().get(id).cloned()
    }

    pub fn save_count(&self) -> u32 {
        *self.saves.lock().unwrap()
    }
}

impl NodeRegistry for MemoryRegistry {
    fn list_nodes(&self) -> Result<Vec<Node>, StoreError> {
        if self.fail_list {
            return Err(StoreError::Io {
                context: "list nodes".to_string(),
                source: std::io::Error::other("registry offline"),
            });
        }
        Ok(self.nodes.lock().unwrap().values().cloned().collect())
    }

    fn get_node(&self, id: &str) -> Result<Node, StoreError> {
        self.node(id).ok_or_else(|| StoreError::NotFound {
            kind: "node",
            id: id.to_string(),
        })
    }

    fn save_node(&self, id: &str, node: &Node) -> Result<(), StoreError> {
        *self.saves.lock().unwrap() += 1;
        self.nodes
            .lock()
            .unwrap()
            .insert(id.to_string(), node.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryAdvisories {
    pub created: Mutex<Vec<Advisory>>,
    /// Ids reported as already taken, to exercise id disambiguation.
    pub taken: Mutex<BTreeSet<String>>,
    /// Ids containing this character are refused as invalid.
    pub invalid_char: Option<char>,
}

impl MemoryAdvisories {
    pub fn rejecting_ids_with(c: char) -> Self {
        MemoryAdvisories {
            invalid_char: Some(c),
            ..MemoryAdvisories::default()
        }
    }

    pub fn all(&self) -> Vec<Advisory> {
        self.created.lock().unwrap().clone()
    }
}

impl AdvisoryStore for MemoryAdvisories {
    fn create_advisory(&self, advisory: &Advisory) -> Result<(), StoreError> {
        if self.invalid_char.is_some_and(|c| advisory.id.contains(c)) {
            return Err(StoreError::InvalidId {
                kind: "advisory",
                id: advisory.id.clone(),
            });
        }
        if !self.taken.lock().unwrap().insert(advisory.id.clone()) {
            return Err(StoreError::Conflict {
                kind: "advisory",
                id: advisory.id.clone(),
            });
        }
        self.created.lock().unwrap().push(advisory.clone());
        Ok(())
    }
}

pub fn node(id: &str, paths: &[&str]) -> Node {
    Node {
        id: id.to_string(),
        paths: paths.iter().map(|p| p.to_string()).collect(),
        ..Node::default()
    }
}

pub fn node_with_patterns(id: &str, paths: &[&str], forbid: &[&str], require: &[&str]) -> Node {
    let mut n = node(id, paths);
    n.checks = Some(NodeChecks {
        patterns: Some(PatternRules {
            forbid: forbid.iter().map(|p| p.to_string()).collect(),
            require: require.iter().map(|p| p.to_string()).collect(),
            ..PatternRules::default()
        }),
        ..NodeChecks::default()
    });
    n
}

pub fn node_with_baseline(id: &str, paths: &[&str], baseline: &[(&str, &str)]) -> Node {
    let mut n = node(id, paths);
    n.checks = Some(NodeChecks {
        checksum: Some("sha256".to_string()),
        baseline: baseline
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..NodeChecks::default()
    });
    n
}
