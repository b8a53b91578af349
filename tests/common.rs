//! Common test utilities for building workflows, payloads and engines.
use cadence::prelude::*;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

/// The instant every test engine is frozen at.
#[allow(dead_code)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_now())
}

/// An engine with the default handlers and a frozen clock.
#[allow(dead_code)]
pub fn test_engine() -> WorkflowEngine {
    WorkflowEngine::builder()
        .with_clock(Arc::new(fixed_clock()))
        .build()
}

/// Shorthand for a node whose config is given as a JSON object literal.
#[allow(dead_code)]
pub fn node(id: &str, node_type: &str, config: Value) -> Node {
    let config = match config {
        Value::Object(map) => NodeConfig::from(map),
        _ => NodeConfig::new(),
    };
    Node::new(id, node_type, config)
}

#[allow(dead_code)]
pub fn condition_node(id: &str, config: Value) -> Node {
    node(id, "condition", config)
}

/// A normalized context for a contact with the given tags.
#[allow(dead_code)]
pub fn context_with_tags(tags: &[&str]) -> Context {
    normalize(
        &Trigger::new(TriggerType::Manual),
        &json!({ "contact_id": "c-1", "email": "jane@example.com", "tags": tags }),
        &fixed_clock(),
    )
}

/// A typical contact payload as a form submission would deliver it.
#[allow(dead_code)]
pub fn jane_payload() -> Value {
    json!({
        "contact_id": "c-1",
        "email": "jane@example.com",
        "first_name": "Jane",
        "last_name": "Doe",
        "company": "Acme Inc",
        "phone": "+15550100",
        "tags": ["lead"],
        "status": "new",
    })
}

/// A welcome sequence: wait, email, tag, then a tag condition.
///
/// Valid as written; every node passes validation.
#[allow(dead_code)]
pub fn create_welcome_workflow() -> Workflow {
    Workflow {
        name: Some("Welcome sequence".to_string()),
        trigger: Trigger::new(TriggerType::FormSubmission),
        nodes: vec![
            node("wait-1", "wait", json!({ "wait_days": 1, "wait_unit": "days" })),
            node(
                "email-1",
                "send_email",
                json!({ "subject": "Welcome {{first_name}}", "body": "Hi {{first_name}} from {{company}}" }),
            ),
            node("tag-1", "add_tag", json!({ "tag": "welcomed" })),
            condition_node(
                "check-1",
                json!({ "condition_type": "has_tag", "tag": "welcomed" }),
            ),
        ],
        edges: vec![
            Edge {
                id: "e1".to_string(),
                source: "wait-1".to_string(),
                target: "email-1".to_string(),
                source_handle: None,
            },
            Edge {
                id: "e2".to_string(),
                source: "email-1".to_string(),
                target: "tag-1".to_string(),
                source_handle: None,
            },
            Edge {
                id: "e3".to_string(),
                source: "tag-1".to_string(),
                target: "check-1".to_string(),
                source_handle: None,
            },
        ],
    }
}

/// The same welcome workflow in the engine's JSON format.
#[allow(dead_code)]
pub const WELCOME_WORKFLOW_JSON: &str = r#"{
    "name": "Welcome sequence",
    "trigger": { "type": "form_submission" },
    "nodes": [
        { "id": "wait-1", "type": "wait", "config": { "wait_days": 1, "wait_unit": "days" } },
        { "id": "email-1", "type": "send_email", "config": { "subject": "Welcome {{first_name}}", "body": "Hi {{first_name}} from {{company}}" } },
        { "id": "tag-1", "type": "add_tag", "config": { "tag": "welcomed" } },
        { "id": "check-1", "type": "condition", "config": { "condition_type": "has_tag", "tag": "welcomed" } }
    ],
    "edges": [
        { "id": "e1", "source": "wait-1", "target": "email-1" },
        { "id": "e2", "source": "email-1", "target": "tag-1" },
        { "id": "e3", "source": "tag-1", "target": "check-1" }
    ]
}"#;
