//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the cadence crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let workflow = Workflow::from_file("path/to/workflow.json")?;
//! let events = SampleEvents::from_file("path/to/payloads.json")?;
//!
//! let engine = WorkflowEngine::builder().build();
//! for result in engine.run_batch(&workflow, events.payloads()) {
//!     println!("{}", TraceFormatter::format_result(&result));
//! }
//! # Ok(())
//! # }
//! ```

// Engine
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::executor::{
    Branch, EngineBuilder, RunError, Step, StepStatus, WorkflowEngine, WorkflowResult,
};
pub use crate::handler::{ExecutionScope, NodeHandler, Outcome};

// Definitions
pub use crate::workflow::{
    Edge, IntoWorkflow, Node, NodeConfig, NodeType, Trigger, TriggerType, Workflow,
};

// State
pub use crate::context::{Contact, Context, Opportunity, normalize};

// Validation
pub use crate::validation::{Issue, validate_edges, validate_node, validate_workflow};

// Data
pub use crate::data::SampleEvents;

// Error types
pub use crate::error::{DefinitionError, NodeError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
