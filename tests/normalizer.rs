//! Tests for turning raw trigger payloads into a canonical context.
mod common;
use cadence::prelude::*;
use common::*;
use serde_json::json;

#[cfg(test)]
mod normalizer_tests {
    use super::*;

    fn normalize_as(trigger_type: TriggerType, raw: serde_json::Value) -> Context {
        normalize(&Trigger::new(trigger_type), &raw, &fixed_clock())
    }

    #[test]
    fn test_empty_payload_yields_complete_defaults() {
        let context = normalize_as(TriggerType::ContactCreated, json!({}));

        assert_eq!(context.trigger_type, "contact_created");
        assert_eq!(context.triggered_at, "2024-05-01T12:00:00.000Z");
        assert_eq!(context.contact, Contact::default());
        assert_eq!(context.opportunity, Opportunity::default());
        assert_eq!(context.opportunity.value, 0.0);
        assert!(context.meta.is_empty());
    }

    #[test]
    fn test_non_object_payload_is_treated_as_empty() {
        let context = normalize_as(TriggerType::Manual, json!("not an object"));
        assert_eq!(context.contact, Contact::default());
        assert!(context.meta.is_empty());
    }

    #[test]
    fn test_top_level_contact_fields() {
        let context = normalize_as(TriggerType::FormSubmission, jane_payload());
        let contact = &context.contact;

        assert_eq!(contact.id, "c-1");
        assert_eq!(contact.email, "jane@example.com");
        assert_eq!(contact.first_name, "Jane");
        assert_eq!(contact.last_name, "Doe");
        assert_eq!(contact.company, "Acme Inc");
        assert_eq!(contact.tags, vec!["lead"]);
        assert_eq!(contact.status, "new");
    }

    #[test]
    fn test_nested_contact_object_takes_precedence() {
        let context = normalize_as(
            TriggerType::Manual,
            json!({
                "email": "top@example.com",
                "contact": { "id": "nested-1", "email": "nested@example.com" }
            }),
        );
        assert_eq!(context.contact.id, "nested-1");
        assert_eq!(context.contact.email, "nested@example.com");
    }

    #[test]
    fn test_full_name_is_split_when_parts_are_missing() {
        let context = normalize_as(TriggerType::Manual, json!({ "name": "Mary Ann Smith" }));
        assert_eq!(context.contact.first_name, "Mary");
        assert_eq!(context.contact.last_name, "Ann Smith");

        let explicit = normalize_as(
            TriggerType::Manual,
            json!({ "name": "Mary Smith", "first_name": "May" }),
        );
        assert_eq!(explicit.contact.first_name, "May");
        assert_eq!(explicit.contact.last_name, "Smith");
    }

    #[test]
    fn test_opportunity_from_top_level_fields() {
        let context = normalize_as(
            TriggerType::OpportunityCreated,
            json!({
                "opportunity_id": "opp-9",
                "stage": "proposal",
                "opportunity_value": "2500.5",
                "opportunity_status": "open",
                "pipeline": "sales",
            }),
        );
        let opportunity = &context.opportunity;
        assert_eq!(opportunity.id, "opp-9");
        assert_eq!(opportunity.stage, "proposal");
        assert_eq!(opportunity.value, 2500.5);
        assert_eq!(opportunity.status, "open");
        assert_eq!(context.meta["pipeline"], json!("sales"));
    }

    #[test]
    fn test_opportunity_from_nested_object() {
        let context = normalize_as(
            TriggerType::Manual,
            json!({ "opportunity": { "id": "o-1", "stage": "won", "value": 900 } }),
        );
        assert_eq!(context.opportunity.id, "o-1");
        assert_eq!(context.opportunity.stage, "won");
        assert_eq!(context.opportunity.value, 900.0);
    }

    #[test]
    fn test_payload_timestamp_is_kept() {
        let context = normalize_as(
            TriggerType::Manual,
            json!({ "triggered_at": "2023-01-01T00:00:00Z" }),
        );
        assert_eq!(context.triggered_at, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_form_submission_meta() {
        let context = normalize_as(
            TriggerType::FormSubmission,
            json!({ "form_id": "f-1", "form_data": { "plan": "pro" } }),
        );
        assert_eq!(context.meta["form_id"], json!("f-1"));
        assert_eq!(context.meta["form_data"], json!({ "plan": "pro" }));

        let without_data = normalize_as(TriggerType::FormSubmission, json!({}));
        assert_eq!(without_data.meta["form_data"], json!({}));
        assert_eq!(without_data.meta["form_id"], json!(""));
    }

    #[test]
    fn test_trigger_specific_meta() {
        let tag = normalize_as(TriggerType::TagAdded, json!({ "tag": "vip" }));
        assert_eq!(tag.meta["tag"], json!("vip"));

        let opened = normalize_as(TriggerType::EmailOpened, json!({ "campaign_id": "cmp" }));
        assert_eq!(opened.meta["campaign_id"], json!("cmp"));
        assert!(opened.meta_flag("email_opened"));

        let clicked = normalize_as(
            TriggerType::LinkClicked,
            json!({ "campaign_id": "cmp", "link_url": "https://example.com" }),
        );
        assert_eq!(clicked.meta["link_url"], json!("https://example.com"));
        assert!(clicked.meta_flag("link_clicked"));

        let stage = normalize_as(
            TriggerType::OpportunityStageChanged,
            json!({ "previous_stage": "new", "new_stage": "won" }),
        );
        assert_eq!(stage.meta["previous_stage"], json!("new"));
        assert_eq!(stage.meta["new_stage"], json!("won"));

        let payment = normalize_as(
            TriggerType::PaymentReceived,
            json!({ "amount": "49.99", "invoice_id": "inv-1" }),
        );
        assert_eq!(payment.meta["amount"], json!(49.99));
        assert_eq!(payment.meta["invoice_id"], json!("inv-1"));

        let birthday = normalize_as(TriggerType::Birthday, json!({ "birth_date": "1990-05-01" }));
        assert_eq!(birthday.meta["birth_date"], json!("1990-05-01"));
    }

    #[test]
    fn test_engagement_fields_are_copied_for_any_trigger() {
        let context = normalize_as(
            TriggerType::Manual,
            json!({ "email_opened": true, "link_clicked": 0, "days_since_last_contact": 5 }),
        );
        assert!(context.meta_flag("email_opened"));
        assert!(!context.meta_flag("link_clicked"));
        assert_eq!(context.meta_number("days_since_last_contact"), Some(5.0));
    }

    #[test]
    fn test_custom_and_unset_triggers_add_no_meta() {
        let custom = normalize_as(TriggerType::from("webinar_attended"), json!({ "tag": "x" }));
        assert_eq!(custom.trigger_type, "webinar_attended");
        assert!(custom.meta.is_empty());

        let unset = normalize(&Trigger::default(), &json!({ "tag": "x" }), &fixed_clock());
        assert_eq!(unset.trigger_type, "");
        assert!(unset.meta.is_empty());
    }

    #[test]
    fn test_trigger_condition_is_copied_into_meta() {
        let mut trigger = Trigger::new(TriggerType::TagAdded);
        let mut condition = serde_json::Map::new();
        condition.insert("tag".to_string(), json!("vip"));
        trigger.condition = Some(condition);

        let context = normalize(&trigger, &json!({}), &fixed_clock());
        assert_eq!(context.meta["trigger_condition"], json!({ "tag": "vip" }));
    }
}
