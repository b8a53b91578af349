use super::definition::Workflow;
use crate::error::DefinitionError;

/// A trait for custom data models that can be converted into a Cadence [`Workflow`].
///
/// Builder front-ends export their canvas in whatever shape suits them. Implementing
/// this trait on those structs provides the translation layer into the engine's
/// canonical definition.
///
/// # Example
///
/// ```rust,no_run
/// use cadence::prelude::*;
/// use cadence::error::DefinitionError;
///
/// struct CanvasStep { key: String, kind: String }
/// struct Canvas { event: String, steps: Vec<CanvasStep> }
///
/// impl IntoWorkflow for Canvas {
///     fn into_workflow(self) -> Result<Workflow, DefinitionError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|step| Node::new(step.key, step.kind.as_str(), NodeConfig::new()))
///             .collect();
///         Ok(Workflow {
///             name: None,
///             trigger: Trigger::new(self.event.as_str()),
///             nodes,
///             edges: vec![],
///         })
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a runnable workflow definition.
    fn into_workflow(self) -> Result<Workflow, DefinitionError>;
}

impl IntoWorkflow for Workflow {
    fn into_workflow(self) -> Result<Workflow, DefinitionError> {
        Ok(self)
    }
}
