//! Structural checks over workflow definitions.
//!
//! Validation never executes anything and never fails: problems come back as an
//! ordered list of [`Issue`]s, and the caller decides whether they block saving or
//! running the workflow.

use crate::workflow::{Edge, Node, Trigger};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

mod rules;

pub use rules::validate_node;

pub const TRIGGER_NOT_SET: &str = "Workflow trigger is not set";
pub const NO_ACTION_NODES: &str = "Add at least one action node to the workflow";

/// A single validation problem, optionally tied to the node that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub node_id: Option<String>,
    /// 1-based position of the node in the workflow.
    pub position: Option<usize>,
    pub message: String,
}

impl Issue {
    pub fn workflow(message: impl Into<String>) -> Self {
        Self {
            node_id: None,
            position: None,
            message: message.into(),
        }
    }

    pub fn node(node_id: &str, position: usize, message: impl Into<String>) -> Self {
        Self {
            node_id: Some(node_id.to_string()),
            position: Some(position),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.node_id, self.position) {
            (Some(id), Some(position)) => write!(f, "Step {} ({}): {}", position, id, self.message),
            (Some(id), None) => write!(f, "{}: {}", id, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Validates a whole workflow.
///
/// Order is fixed: the trigger issue, then the empty-workflow issue, then every
/// node's issues in node order.
pub fn validate_workflow(trigger: &Trigger, nodes: &[Node]) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !trigger.is_set() {
        issues.push(Issue::workflow(TRIGGER_NOT_SET));
    }
    if nodes.is_empty() {
        issues.push(Issue::workflow(NO_ACTION_NODES));
    }

    for (index, node) in nodes.iter().enumerate() {
        issues.extend(
            validate_node(node)
                .into_iter()
                .map(|message| Issue::node(&node.id, index + 1, message)),
        );
    }

    issues
}

/// Checks the graph metadata: duplicate node ids and edges pointing at nodes that
/// do not exist. Advisory only; the executor never reads edges.
pub fn validate_edges(nodes: &[Node], edges: &[Edge]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen: AHashSet<&str> = AHashSet::new();

    for (index, node) in nodes.iter().enumerate() {
        if !seen.insert(node.id.as_str()) {
            issues.push(Issue::node(
                &node.id,
                index + 1,
                format!("Duplicate node id '{}'", node.id),
            ));
        }
    }

    for edge in edges {
        for (end, node_id) in [("source", &edge.source), ("target", &edge.target)] {
            if !seen.contains(node_id.as_str()) {
                issues.push(Issue::workflow(format!(
                    "Edge '{}' references unknown {} node '{}'",
                    edge.id, end, node_id
                )));
            }
        }
    }

    issues
}
