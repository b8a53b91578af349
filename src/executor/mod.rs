use crate::clock::{Clock, SystemClock};
use crate::context::{Context, normalize};
use crate::error::NodeError;
use crate::handler::{
    ExecutionScope, MutationHandler, NodeHandler, Outcome, create_handler_by_name,
    register_default_handlers,
};
use crate::validation::{Issue, validate_node, validate_workflow};
use crate::workflow::{Node, NodeType, Trigger, Workflow};
use ahash::AHashMap;
use rayon::prelude::*;
use serde_json::Value;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

mod result;

pub use result::{Branch, RunError, Step, StepStatus, WorkflowResult};

const UNEXPECTED_FAILURE: &str = "Unexpected error while executing node";

/// Runs workflows as a straight-line preview.
///
/// Nodes execute strictly in array order. Edges are graph metadata for the
/// builder and are never followed, and a condition node records its branch
/// without changing which node runs next. A run stops at the first failing node;
/// nothing is retried.
///
/// A `WorkflowEngine` holds no per-run state, so one instance can be shared
/// across threads and used for many runs at once.
pub struct WorkflowEngine {
    registry: AHashMap<String, Box<dyn NodeHandler>>,
    /// Custom type names mapped onto the built-in type they run as.
    aliases: AHashMap<String, NodeType>,
    clock: Arc<dyn Clock>,
}

pub struct EngineBuilder {
    registry: AHashMap<String, Box<dyn NodeHandler>>,
    aliases: AHashMap<String, NodeType>,
    clock: Arc<dyn Clock>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        let mut registry: AHashMap<String, Box<dyn NodeHandler>> = AHashMap::new();
        register_default_handlers(&mut registry);
        Self {
            registry,
            aliases: AHashMap::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Maps a custom node type name onto one of the built-in handlers. Aliased
    /// nodes are validated against the built-in type's required fields.
    pub fn with_type_alias(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        match create_handler_by_name(builtin_type_name) {
            Some(handler) => {
                self.registry.insert(user_type_name.to_string(), handler);
                self.aliases
                    .insert(user_type_name.to_string(), NodeType::from(builtin_type_name));
            }
            None => warn!(
                alias = user_type_name,
                builtin = builtin_type_name,
                "Ignoring alias to a node type without a built-in handler"
            ),
        }
        self
    }

    /// Registers a handler, replacing any handler already bound to its type.
    pub fn with_handler(mut self, handler: Box<dyn NodeHandler>) -> Self {
        self.aliases.remove(handler.node_type());
        self.registry.insert(handler.node_type().to_string(), handler);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> WorkflowEngine {
        WorkflowEngine {
            registry: self.registry,
            aliases: self.aliases,
            clock: self.clock,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl WorkflowEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Validates, normalizes and executes one run.
    ///
    /// Never panics on a failing node and never returns an error: every failure
    /// is reported through `WorkflowResult::error`, next to the steps recorded
    /// up to and including the failing one.
    pub fn run(&self, trigger: &Trigger, nodes: &[Node], raw_payload: &Value) -> WorkflowResult {
        let trigger_type = trigger
            .kind()
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_default();
        let result = WorkflowResult::started(trigger_type, self.clock.now());
        info!(
            trigger_type = %result.trigger_type,
            nodes = nodes.len(),
            "Starting workflow run"
        );

        let checked = self.resolve_aliases(nodes);
        let issues = validate_workflow(trigger, &checked);
        if !issues.is_empty() {
            let mut result = result;
            // The first offending node gets an error step; it is never executed.
            if let Some(node) = issues[0].position.and_then(|p| nodes.get(p - 1)) {
                let step = Step::pending(node, issues[0].position.unwrap_or(1));
                result.steps.push(step.fail(issues[0].message.clone()));
            }
            warn!(issues = issues.len(), first = %issues[0], "Workflow failed validation");
            return result.fail(RunError::invalid(issues));
        }

        let context = normalize(trigger, raw_payload, self.clock.as_ref());
        self.execute(nodes, &checked, context, result)
    }

    /// `validate_workflow` as this engine sees the nodes, with type aliases
    /// resolved to their built-in types.
    pub fn validate(&self, trigger: &Trigger, nodes: &[Node]) -> Vec<Issue> {
        validate_workflow(trigger, &self.resolve_aliases(nodes))
    }

    pub fn run_workflow(&self, workflow: &Workflow, raw_payload: &Value) -> WorkflowResult {
        self.run(&workflow.trigger, &workflow.nodes, raw_payload)
    }

    /// Runs the workflow once per payload, in parallel. Results keep input order.
    pub fn run_batch(&self, workflow: &Workflow, raw_payloads: &[Value]) -> Vec<WorkflowResult> {
        raw_payloads
            .par_iter()
            .map(|payload| self.run_workflow(workflow, payload))
            .collect()
    }

    /// Nodes as validation sees them: aliased types are rewritten to the built-in
    /// type they run as. Borrows when no alias applies.
    fn resolve_aliases<'a>(&self, nodes: &'a [Node]) -> Cow<'a, [Node]> {
        if !nodes.iter().any(|node| self.alias_of(node).is_some()) {
            return Cow::Borrowed(nodes);
        }
        Cow::Owned(
            nodes
                .iter()
                .map(|node| match self.alias_of(node) {
                    Some(builtin) => Node {
                        node_type: builtin.clone(),
                        ..node.clone()
                    },
                    None => node.clone(),
                })
                .collect(),
        )
    }

    fn alias_of(&self, node: &Node) -> Option<&NodeType> {
        self.aliases.get(node.node_type.as_str())
    }

    fn execute(
        &self,
        nodes: &[Node],
        checked: &[Node],
        mut context: Context,
        mut result: WorkflowResult,
    ) -> WorkflowResult {
        for (offset, (node, checked_node)) in nodes.iter().zip(checked).enumerate() {
            let index = offset + 1;
            let step = Step::pending(node, index);

            if let Some(message) = validate_node(checked_node).into_iter().next() {
                result.steps.push(step.fail(message.clone()));
                warn!(node_id = %node.id, index, error = %message, "Node failed validation");
                return result.fail(RunError::at_node(&node.id, message));
            }

            let scope = ExecutionScope {
                clock: self.clock.as_ref(),
                index,
            };
            match self.dispatch(node, &context, &scope) {
                Ok(outcome) => {
                    debug!(
                        node_id = %node.id,
                        node_type = %node.node_type,
                        index,
                        branch = ?outcome.branch,
                        "Executed node"
                    );
                    result.steps.push(step.succeed(outcome.output, outcome.branch));
                    if let Some(next) = outcome.context {
                        context = next;
                    }
                }
                Err(error) => {
                    let message = error.to_string();
                    warn!(node_id = %node.id, index, error = %message, "Node execution failed");
                    result.steps.push(step.fail(message.clone()));
                    return result.fail(RunError::at_node(&node.id, message));
                }
            }
        }

        info!(steps = result.steps.len(), "Workflow run completed");
        result.succeed(context, self.clock.now())
    }

    /// Looks up the handler for the node's type and runs it. Unregistered types
    /// fall through to the mutation handler; a panicking handler is reported as
    /// an ordinary node failure.
    fn dispatch(
        &self,
        node: &Node,
        context: &Context,
        scope: &ExecutionScope<'_>,
    ) -> Result<Outcome, NodeError> {
        let handler: &dyn NodeHandler = match self.registry.get(node.node_type.as_str()) {
            Some(handler) => handler.as_ref(),
            None => &MutationHandler,
        };

        panic::catch_unwind(AssertUnwindSafe(|| handler.handle(node, context, scope)))
            .unwrap_or_else(|_| Err(NodeError::Failed(UNEXPECTED_FAILURE.to_string())))
    }
}
