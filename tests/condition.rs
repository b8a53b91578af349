//! Tests for condition node evaluation.
mod common;
use cadence::condition::evaluate;
use cadence::prelude::*;
use common::*;
use serde_json::json;

#[cfg(test)]
mod condition_tests {
    use super::*;

    fn context_from(raw: serde_json::Value) -> Context {
        normalize(&Trigger::new(TriggerType::Manual), &raw, &fixed_clock())
    }

    #[test]
    fn test_has_tag() {
        let node = condition_node("c", json!({ "condition_type": "has_tag", "tag": "prospect" }));
        assert!(evaluate(&node, &context_with_tags(&["prospect"])));
        assert!(!evaluate(&node, &context_with_tags(&["customer"])));
        assert!(!evaluate(&node, &context_with_tags(&["Prospect"])));
    }

    #[test]
    fn test_engagement_flags_default_to_false() {
        let opened = condition_node("c", json!({ "condition_type": "email_opened" }));
        let clicked = condition_node("c", json!({ "condition_type": "link_clicked" }));

        assert!(!evaluate(&opened, &context_from(json!({}))));
        assert!(evaluate(&opened, &context_from(json!({ "email_opened": true }))));
        assert!(!evaluate(&clicked, &context_from(json!({ "email_opened": true }))));
        assert!(evaluate(&clicked, &context_from(json!({ "link_clicked": true }))));
    }

    #[test]
    fn test_no_response_uses_threshold() {
        let default_threshold = condition_node("c", json!({ "condition_type": "no_response" }));
        let custom_threshold = condition_node(
            "c",
            json!({ "condition_type": "no_response", "no_response_days": 7 }),
        );
        let four_days = context_from(json!({ "days_since_last_contact": 4 }));

        assert!(evaluate(&default_threshold, &four_days));
        assert!(!evaluate(&custom_threshold, &four_days));
        assert!(evaluate(
            &default_threshold,
            &context_from(json!({ "days_since_last_contact": 3 }))
        ));
        assert!(!evaluate(&default_threshold, &context_from(json!({}))));
    }

    #[test]
    fn test_opportunity_value_threshold() {
        let node = condition_node("c", json!({ "condition_type": "opp_value_gt", "opp_value": "1000" }));
        assert!(evaluate(&node, &context_from(json!({ "value": 1500 }))));
        assert!(!evaluate(&node, &context_from(json!({ "value": 1000 }))));

        let not_a_number = condition_node(
            "c",
            json!({ "condition_type": "opp_value_gt", "opp_value": "lots" }),
        );
        assert!(!evaluate(&not_a_number, &context_from(json!({ "value": 1500 }))));
    }

    #[test]
    fn test_contact_status() {
        let node = condition_node(
            "c",
            json!({ "condition_type": "contact_status", "contact_status": "customer" }),
        );
        assert!(evaluate(&node, &context_from(json!({ "status": "customer" }))));
        assert!(!evaluate(&node, &context_from(json!({ "status": "lead" }))));
    }

    #[test]
    fn test_unknown_condition_type_is_permissive() {
        let unknown = condition_node("c", json!({ "condition_type": "moon_phase" }));
        let unset = condition_node("c", json!({}));
        assert!(evaluate(&unknown, &context_from(json!({}))));
        assert!(evaluate(&unset, &context_from(json!({}))));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let node = condition_node("c", json!({ "condition_type": "has_tag", "tag": "vip" }));
        let context = context_with_tags(&["vip"]);
        let before = context.clone();

        let first = evaluate(&node, &context);
        let second = evaluate(&node, &context);
        assert_eq!(first, second);
        assert_eq!(context, before);
    }
}
