use thiserror::Error;

/// Errors raised by a node handler while a single node is being executed.
///
/// These never escape [`WorkflowEngine::run`](crate::executor::WorkflowEngine::run):
/// the executor turns them into an `error` step and a failed `WorkflowResult`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("Node '{node_id}' is missing required config field '{field}'")]
    MissingConfig { node_id: String, field: String },

    #[error("Node '{node_id}' has an invalid value for '{field}': {message}")]
    InvalidConfig {
        node_id: String,
        field: String,
        message: String,
    },

    #[error("{0}")]
    Failed(String),
}

/// Errors that can occur while loading a workflow or its event payloads.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workflow definition: {0}")]
    ConversionError(String),
}
