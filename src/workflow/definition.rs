use super::{NodeConfig, NodeType, TriggerType};
use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

/// The event that starts a workflow. Exactly one per workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type", default)]
    pub trigger_type: Option<TriggerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Map<String, Value>>,
}

impl Trigger {
    pub fn new(trigger_type: impl Into<TriggerType>) -> Self {
        Self {
            trigger_type: Some(trigger_type.into()),
            condition: None,
        }
    }

    /// The trigger type, treating an empty name the same as a missing one.
    pub fn kind(&self) -> Option<&TriggerType> {
        self.trigger_type
            .as_ref()
            .filter(|kind| !kind.as_str().is_empty())
    }

    pub fn is_set(&self) -> bool {
        self.kind().is_some()
    }
}

/// A single step of a workflow: an action or a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub config: NodeConfig,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<NodeType>, config: NodeConfig) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            config,
        }
    }
}

/// A declared connection between two nodes. Kept as graph metadata for the
/// builder canvas; the executor walks nodes in array order and never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    /// `"yes"`/`"no"` for the outputs of a condition node, `None` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
}

/// The complete, persisted definition of an automation workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a workflow in this crate's own JSON format from a file.
    pub fn from_file(path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}
