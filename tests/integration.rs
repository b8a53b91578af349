//! Integration tests for Cadence
//!
//! End-to-end tests that load definitions from JSON, run them and format the trace.
//!
mod common;
use cadence::prelude::*;
use common::*;
use serde_json::json;
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_workflow_json_matches_builder_fixture() {
        let parsed = Workflow::from_json(WELCOME_WORKFLOW_JSON).expect("Failed to parse workflow");
        assert_eq!(parsed, create_welcome_workflow());
        assert_eq!(parsed.nodes[1].node_type, NodeType::SendEmail);
        assert_eq!(parsed.trigger.kind(), Some(&TriggerType::FormSubmission));
    }

    #[test]
    fn test_workflow_round_trips_through_serde() {
        let workflow = create_welcome_workflow();
        let json = serde_json::to_string(&workflow).expect("Failed to serialize workflow");
        let back = Workflow::from_json(&json).expect("Failed to parse serialized workflow");
        assert_eq!(back, workflow);
    }

    #[test]
    fn test_custom_types_survive_loading() {
        let json = r#"{
            "trigger": { "type": "webinar_attended" },
            "nodes": [ { "id": "n1", "type": "send_postcard" } ]
        }"#;
        let workflow = Workflow::from_json(json).expect("Failed to parse workflow");

        assert_eq!(workflow.trigger.kind().map(|k| k.as_str()), Some("webinar_attended"));
        assert_eq!(workflow.nodes[0].node_type.as_str(), "send_postcard");
        assert!(workflow.nodes[0].config.as_map().is_empty());
        assert!(workflow.edges.is_empty());
    }

    #[test]
    fn test_invalid_json_is_a_definition_error() {
        let error = Workflow::from_json("{ not json").expect_err("should fail");
        assert!(matches!(error, DefinitionError::JsonParseError(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let error = Workflow::from_file("does/not/exist.json").expect_err("should fail");
        assert!(matches!(error, DefinitionError::Io { .. }));
        assert!(error.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_workflow_and_payloads_from_files() {
        let dir = std::env::temp_dir().join(format!("cadence-it-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("Failed to create temp dir");
        let workflow_path = dir.join("workflow.json");
        let payload_path = dir.join("payloads.json");
        fs::write(&workflow_path, WELCOME_WORKFLOW_JSON).expect("Failed to write workflow");
        fs::write(
            &payload_path,
            json!([{ "first_name": "Ana" }, { "first_name": "Ben", "tags": "welcomed" }]).to_string(),
        )
        .expect("Failed to write payloads");

        let workflow = Workflow::from_file(workflow_path.to_str().expect("utf-8 path"))
            .expect("Failed to load workflow")
            .into_workflow()
            .expect("Identity conversion failed");
        let events = SampleEvents::from_file(payload_path.to_str().expect("utf-8 path"))
            .expect("Failed to load payloads");

        let results = test_engine().run_batch(&workflow, events.payloads());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|result| result.success));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_single_payload_object_is_accepted() {
        let events = SampleEvents::from_json(r#"{ "email": "solo@example.com" }"#)
            .expect("Failed to parse payload");
        assert_eq!(events.payloads().len(), 1);
        assert_eq!(SampleEvents::demo().payloads().len(), 1);
    }

    #[test]
    fn test_result_serializes_with_wire_names() {
        let workflow = create_welcome_workflow();
        let result = test_engine().run_workflow(&workflow, &jane_payload());
        let value = serde_json::to_value(&result).expect("Failed to serialize result");

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["trigger_type"], json!("form_submission"));
        assert_eq!(value["steps"][0]["status"], json!("success"));
        assert_eq!(value["steps"][3]["branch_taken"], json!("YES"));
        assert_eq!(value["final_payload"]["contact"]["tags"], json!(["lead", "welcomed"]));
        assert_eq!(value["started_at"], json!("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn test_free_form_tags_write_round_trips_through_json() {
        let nodes = vec![node(
            "update",
            "update_contact",
            json!({ "field": "tags", "field_value": "vip" }),
        )];
        let result = test_engine().run(&Trigger::new(TriggerType::Manual), &nodes, &jane_payload());
        assert!(result.success);

        let json = serde_json::to_string(&result).expect("Failed to serialize result");
        let back: WorkflowResult = serde_json::from_str(&json).expect("Failed to parse result");
        assert_eq!(back, result);

        let contact = back.final_payload.expect("final payload").contact;
        assert_eq!(contact.tags, vec!["lead"]);
        assert_eq!(contact.extra.get("tags"), Some(&json!("vip")));
    }

    #[test]
    fn test_trace_formatting_for_success() {
        let result = test_engine().run_workflow(&create_welcome_workflow(), &jane_payload());
        let trace = TraceFormatter::format_result(&result);

        assert!(trace.starts_with("Workflow run (trigger: form_submission) SUCCEEDED after 4 step(s)"));
        assert!(trace.contains("2. [ok] send_email (email-1): Email would be sent to jane@example.com"));
        assert!(trace.contains("4. [ok] condition (check-1): Condition 'has_tag' evaluated to YES -> YES"));
    }

    #[test]
    fn test_trace_formatting_for_validation_failure() {
        let nodes = vec![node("sms", "send_sms", json!({})), node("tag", "add_tag", json!({}))];
        let result = test_engine().run(&Trigger::default(), &nodes, &json!({}));
        let trace = TraceFormatter::format_result(&result);

        assert!(trace.starts_with("Workflow run (trigger: <unset>) FAILED after 0 step(s)"));
        assert!(trace.contains("Failed: Workflow trigger is not set"));
        assert!(trace.contains("All issues:"));
        assert!(trace.contains("  - Step 2 (tag): Tag is required"));
    }

    #[test]
    fn test_trace_formatting_for_node_failure() {
        let nodes = vec![node("hook", "custom_webhook", json!({ "url": "mailto:x" }))];
        let result = test_engine().run(&Trigger::new(TriggerType::Manual), &nodes, &json!({}));
        let trace = TraceFormatter::format_result(&result);

        assert!(trace.contains("1. [!!] custom_webhook (hook):"));
        assert!(trace.contains("Failed at node 'hook':"));
    }
}
