//! Node handlers: one per node type, looked up by type name at run time.
//!
//! The executor holds a registry of [`NodeHandler`]s instead of a central switch,
//! so a new node type is supported by registering a handler for it.

use crate::clock::Clock;
use crate::context::Context;
use crate::error::NodeError;
use crate::executor::Branch;
use crate::mutator;
use crate::workflow::{Node, NodeType};
use serde_json::{Value, json};

mod builtin;
pub mod template;

pub(crate) use builtin::{create_handler_by_name, register_default_handlers};

/// What the executor hands to a handler besides the node and the context.
pub struct ExecutionScope<'a> {
    pub clock: &'a dyn Clock,
    /// 1-based position of the node being executed.
    pub index: usize,
}

/// The result of handling one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The replacement context, or `None` when the node changes no state.
    pub context: Option<Context>,
    pub output: Value,
    pub branch: Option<Branch>,
}

impl Outcome {
    /// A side-effect description that leaves the context as it was.
    pub fn described(output: Value) -> Self {
        Self {
            context: None,
            output,
            branch: None,
        }
    }

    pub fn updated(context: Context, output: Value) -> Self {
        Self {
            context: Some(context),
            output,
            branch: None,
        }
    }
}

/// Defines the contract for executing a specific node type.
pub trait NodeHandler: Send + Sync {
    fn node_type(&self) -> &str;
    fn handle(
        &self,
        node: &Node,
        context: &Context,
        scope: &ExecutionScope<'_>,
    ) -> Result<Outcome, NodeError>;
}

/// Handles every node type without a registered handler by running it through
/// the payload mutator and describing the change.
pub struct MutationHandler;

impl NodeHandler for MutationHandler {
    fn node_type(&self) -> &str {
        "*"
    }

    fn handle(
        &self,
        node: &Node,
        context: &Context,
        _scope: &ExecutionScope<'_>,
    ) -> Result<Outcome, NodeError> {
        if node.node_type == NodeType::UpdateContact && !node.config.is_set("field") {
            return Err(NodeError::MissingConfig {
                node_id: node.id.clone(),
                field: "field".to_string(),
            });
        }

        let next = mutator::apply(node, context);
        Ok(Outcome::updated(
            next,
            json!({ "description": mutator::describe(node) }),
        ))
    }
}
