use crate::context::Context;
use crate::validation::Issue;
use crate::workflow::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The outcome of a condition node. Recorded on the step; it does not change
/// which node runs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Branch {
    Yes,
    No,
}

impl From<bool> for Branch {
    fn from(result: bool) -> Self {
        if result { Branch::Yes } else { Branch::No }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Yes => write!(f, "YES"),
            Branch::No => write!(f, "NO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Success,
    Error,
}

/// The recorded outcome of one node in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub node_id: String,
    pub node_type: String,
    /// 1-based position of the node in the workflow.
    pub index: usize,
    pub status: StepStatus,
    pub output: Option<Value>,
    pub error: Option<String>,
    pub branch_taken: Option<Branch>,
}

impl Step {
    pub fn pending(node: &Node, index: usize) -> Self {
        Self {
            node_id: node.id.clone(),
            node_type: node.node_type.to_string(),
            index,
            status: StepStatus::Pending,
            output: None,
            error: None,
            branch_taken: None,
        }
    }

    pub fn succeed(self, output: Value, branch_taken: Option<Branch>) -> Self {
        Self {
            status: StepStatus::Success,
            output: Some(output),
            branch_taken,
            ..self
        }
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Error,
            error: Some(message.into()),
            ..self
        }
    }
}

/// Why a run failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunError {
    /// `None` when the failure is not tied to a node (e.g. a missing trigger).
    pub failing_node_id: Option<String>,
    pub message: String,
    /// Every validation issue, when the run was stopped by validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

impl RunError {
    pub fn at_node(node_id: &str, message: impl Into<String>) -> Self {
        Self {
            failing_node_id: Some(node_id.to_string()),
            message: message.into(),
            issues: None,
        }
    }

    /// Builds the error for a workflow that did not pass validation.
    /// `issues` must not be empty.
    pub fn invalid(issues: Vec<Issue>) -> Self {
        let (failing_node_id, message) = issues
            .first()
            .map(|issue| (issue.node_id.clone(), issue.message.clone()))
            .unwrap_or_default();
        Self {
            failing_node_id,
            message,
            issues: Some(issues),
        }
    }
}

/// The full output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub success: bool,
    pub trigger_type: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub steps: Vec<Step>,
    pub final_payload: Option<Context>,
    pub error: Option<RunError>,
}

impl WorkflowResult {
    pub(crate) fn started(trigger_type: String, started_at: DateTime<Utc>) -> Self {
        Self {
            success: false,
            trigger_type,
            started_at,
            completed_at: None,
            steps: Vec::new(),
            final_payload: None,
            error: None,
        }
    }

    pub(crate) fn succeed(self, final_payload: Context, completed_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            completed_at: Some(completed_at),
            final_payload: Some(final_payload),
            ..self
        }
    }

    pub(crate) fn fail(self, error: RunError) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..self
        }
    }

    /// The step recorded for `node_id`, if that node was reached.
    pub fn step(&self, node_id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.node_id == node_id)
    }
}
