//! # Cadence - Marketing Automation Workflow Engine
//!
//! **Cadence** is the small interpreter behind marketing automation workflows. It takes a
//! declarative workflow (one trigger plus an ordered list of action and condition nodes),
//! validates it, and executes it against a contact/opportunity event, producing a
//! structured, step-by-step result.
//!
//! Nothing is ever delivered: email, SMS, webhook and payment nodes produce a description
//! of what *would* happen, which makes the engine suitable for builder previews as well
//! as for a production runner that performs the real side effects afterwards.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Definition**: Deserialize a [`workflow::Workflow`] from JSON, or
//!     implement [`workflow::IntoWorkflow`] for your own builder export format.
//! 2.  **Validate**: [`validation::validate_workflow`] returns an ordered list of issues
//!     without running anything. The engine runs it again before every execution.
//! 3.  **Run**: Build a [`executor::WorkflowEngine`] and call `run` with a raw event
//!     payload. The payload is normalized into a [`context::Context`], then every node
//!     executes in array order. The run stops at the first failing node.
//! 4.  **Inspect**: The [`executor::WorkflowResult`] carries every step, the final
//!     context and, on failure, the failing node and message.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cadence::prelude::*;
//! use serde_json::json;
//!
//! let trigger = Trigger::new(TriggerType::FormSubmission);
//! let nodes = vec![
//!     Node::new(
//!         "welcome",
//!         NodeType::SendEmail,
//!         NodeConfig::new()
//!             .with("subject", "Welcome {{first_name}}")
//!             .with("body", "Hi {{first_name}}, thanks for signing up."),
//!     ),
//!     Node::new("tag", NodeType::AddTag, NodeConfig::new().with("tag", "subscriber")),
//! ];
//!
//! let engine = WorkflowEngine::builder().build();
//! let result = engine.run(&trigger, &nodes, &json!({ "email": "jane@example.com", "first_name": "Jane" }));
//!
//! assert!(result.success);
//! println!("{}", TraceFormatter::format_result(&result));
//! ```

pub mod clock;
pub mod condition;
pub mod context;
pub mod data;
pub mod error;
pub mod executor;
pub mod handler;
pub mod mutator;
pub mod prelude;
pub mod trace;
pub mod validation;
pub mod workflow;
