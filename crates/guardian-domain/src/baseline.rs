use crate::digest::sha256_hex;
use crate::error::GuardianError;
use crate::ports::{FileAccess, NodeRegistry};
use guardian_types::{ids, Node, NodeChecks, PathNormalizer};
use std::collections::BTreeMap;
use tracing::info;

/// Snapshots a node's current file digests as its new trusted baseline.
pub struct BaselineApprover<'a> {
    registry: &'a dyn NodeRegistry,
    files: &'a dyn FileAccess,
    normalizer: PathNormalizer,
}

impl<'a> BaselineApprover<'a> {
    pub fn new(
        registry: &'a dyn NodeRegistry,
        files: &'a dyn FileAccess,
        normalizer: PathNormalizer,
    ) -> Self {
        Self {
            registry,
            files,
            normalizer,
        }
    }

    /// Approve the current contents of `node_id`'s files and persist the node.
    ///
    /// Returns the full resulting baseline. Nothing is written when the node
    /// does not exist or a file cannot be hashed.
    pub fn approve(&self, node_id: &str) -> Result<BTreeMap<String, String>, GuardianError> {
        let node = self.registry.get_node(node_id).map_err(|source| {
            if source.is_not_found() {
                GuardianError::NodeNotFound {
                    id: node_id.to_string(),
                }
            } else {
                GuardianError::LoadNode {
                    id: node_id.to_string(),
                    source,
                }
            }
        })?;

        let digests = self
            .current_digests(&node)
            .map_err(|source| GuardianError::Files {
                id: node_id.to_string(),
                source,
            })?;
        let hashed = digests.len();

        let checks = approved_checks(node.checks.as_ref(), digests);
        let updated = Node {
            checks: Some(checks),
            ..node
        };

        self.registry
            .save_node(node_id, &updated)
            .map_err(|source| GuardianError::SaveNode {
                id: node_id.to_string(),
                source,
            })?;

        info!(node_id, hashed, "baseline approved");
        Ok(updated
            .checks
            .map(|c| c.baseline)
            .unwrap_or_default())
    }

    /// Digests of the node's existing files, keyed by the path as declared.
    fn current_digests(&self, node: &Node) -> Result<Vec<(String, String)>, crate::AccessError> {
        let mut out = Vec::new();
        for declared in &node.paths {
            let path = self.normalizer.normalize(declared);
            if !self.files.exists(path)? {
                continue;
            }
            let digest = sha256_hex(&self.files.read_bytes(path)?);
            out.push((declared.clone(), digest));
        }
        Ok(out)
    }
}

/// Build the approved `checks` value from the previous one.
///
/// Checksum mode becomes `sha256`; new digests overwrite entries with the same
/// key; entries for paths that no longer exist are kept; every other field is
/// carried over unchanged.
pub fn approved_checks<I>(previous: Option<&NodeChecks>, digests: I) -> NodeChecks
where
    I: IntoIterator<Item = (String, String)>,
{
    let previous = previous.cloned().unwrap_or_default();
    let mut baseline = previous.baseline.clone();
    baseline.extend(digests);

    NodeChecks {
        checksum: Some(ids::CHECKSUM_SHA256.to_string()),
        baseline,
        ..previous
    }
}
