use crate::error::{GuardianError, StoreError};
use crate::evaluator::RuleEvaluator;
use crate::ports::{AdvisoryStore, NodeRegistry};
use guardian_types::{Advisory, Issue, Node, NodeResult};
use rayon::prelude::*;
use time::OffsetDateTime;
use tracing::{info, warn};

/// How many `-N` suffixes to try when an advisory id is already taken.
const MAX_ID_SUFFIX: u32 = 16;

/// Result of one pass over every registered node.
#[derive(Clone, Debug, Default)]
pub struct RunOutcome {
    /// One entry per node, in registry enumeration order.
    pub results: Vec<NodeResult>,
    pub advisories_created: Vec<Advisory>,
}

impl RunOutcome {
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|r| r.ok)
    }
}

/// Runs every node through the evaluator and opens an advisory for each failure.
pub struct ComplianceRunner<'a> {
    registry: &'a dyn NodeRegistry,
    advisories: &'a dyn AdvisoryStore,
    evaluator: RuleEvaluator<'a>,
    parallel: bool,
}

impl<'a> ComplianceRunner<'a> {
    pub fn new(
        registry: &'a dyn NodeRegistry,
        advisories: &'a dyn AdvisoryStore,
        evaluator: RuleEvaluator<'a>,
    ) -> Self {
        Self {
            registry,
            advisories,
            evaluator,
            parallel: false,
        }
    }

    /// Evaluate nodes on the rayon pool. Advisories are still created in node order.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fails only when the node list cannot be read. A node whose files cannot be
    /// read, or whose advisory cannot be stored, is reported through
    /// [`NodeResult::error`] and the run continues.
    pub fn run_all(&self) -> Result<RunOutcome, GuardianError> {
        let nodes = self.registry.list_nodes().map_err(GuardianError::ListNodes)?;
        info!(nodes = nodes.len(), parallel = self.parallel, "compliance run started");

        let mut results: Vec<NodeResult> = if self.parallel {
            nodes.par_iter().map(|n| self.evaluate_node(n)).collect()
        } else {
            nodes.iter().map(|n| self.evaluate_node(n)).collect()
        };

        let mut advisories_created = Vec::new();
        for result in &mut results {
            // Nodes that could not be evaluated have no issue snapshot to record.
            if result.ok || result.error.is_some() {
                continue;
            }
            match self.open_advisory(&result.node_id, result.issues.clone()) {
                Ok(advisory) => advisories_created.push(advisory),
                Err(err) => {
                    warn!(node_id = %result.node_id, error = %err, "advisory not created");
                    result.error = Some(error_chain(&err));
                }
            }
        }

        info!(
            nodes = results.len(),
            failed = results.iter().filter(|r| !r.ok).count(),
            advisories = advisories_created.len(),
            "compliance run finished"
        );

        Ok(RunOutcome {
            results,
            advisories_created,
        })
    }

    fn evaluate_node(&self, node: &Node) -> NodeResult {
        match self.evaluator.evaluate(node) {
            Ok(issues) => NodeResult {
                node_id: node.id.clone(),
                ok: issues.is_empty(),
                issues,
                error: None,
            },
            Err(err) => {
                warn!(node_id = %node.id, error = %err, "node could not be evaluated");
                NodeResult {
                    node_id: node.id.clone(),
                    ok: false,
                    issues: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn open_advisory(&self, node_id: &str, issues: Vec<Issue>) -> Result<Advisory, GuardianError> {
        let created_at = OffsetDateTime::now_utc();
        let base = advisory_base_id(node_id, created_at);

        for attempt in 0..=MAX_ID_SUFFIX {
            let id = match attempt {
                0 => base.clone(),
                n => format!("{base}-{n}"),
            };
            let advisory = Advisory::open(id, node_id, created_at, issues.clone());
            match self.advisories.create_advisory(&advisory) {
                Ok(()) => {
                    info!(node_id, advisory_id = %advisory.id, issues = advisory.issues.len(), "advisory created");
                    return Ok(advisory);
                }
                Err(StoreError::Conflict { .. }) => continue,
                Err(source) => {
                    return Err(GuardianError::CreateAdvisory {
                        node_id: node_id.to_string(),
                        source,
                    });
                }
            }
        }

        Err(GuardianError::AdvisoryIdExhausted {
            node_id: node_id.to_string(),
            attempts: MAX_ID_SUFFIX + 1,
        })
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// `<node id>-<unix millis>`.
pub fn advisory_base_id(node_id: &str, created_at: OffsetDateTime) -> String {
    let millis = created_at.unix_timestamp_nanos() / 1_000_000;
    format!("{node_id}-{millis}")
}
