use crate::workflow::{Node, NodeConfig, NodeType};

/// Collects the missing-field messages for one node config.
struct Checks<'a> {
    config: &'a NodeConfig,
    issues: Vec<String>,
}

impl<'a> Checks<'a> {
    fn new(config: &'a NodeConfig) -> Self {
        Self {
            config,
            issues: Vec::new(),
        }
    }

    fn require(mut self, key: &str, message: &str) -> Self {
        if !self.config.is_set(key) {
            self.issues.push(message.to_string());
        }
        self
    }

    fn require_at_least(mut self, key: &str, min: f64, message: &str) -> Self {
        if !self.config.number(key).is_some_and(|n| n >= min) {
            self.issues.push(message.to_string());
        }
        self
    }

    fn require_positive(mut self, key: &str, message: &str) -> Self {
        if !self.config.number(key).is_some_and(|n| n > 0.0) {
            self.issues.push(message.to_string());
        }
        self
    }

    fn finish(self) -> Vec<String> {
        self.issues
    }
}

/// Checks that a node's config carries the fields its type needs.
///
/// Purely structural: values are never evaluated against contact data. Types
/// without listed requirements always pass.
pub fn validate_node(node: &Node) -> Vec<String> {
    let config = &node.config;
    let checks = Checks::new(config);

    match node.node_type {
        NodeType::SendEmail => {
            let has_inline = config.is_set("subject") && config.is_set("body");
            if config.is_set("template_id") || has_inline {
                Vec::new()
            } else {
                vec!["Email needs a template or both a subject and a body".to_string()]
            }
        }
        NodeType::Wait => checks
            .require_at_least("wait_days", 1.0, "Wait duration must be at least 1")
            .require("wait_unit", "Wait unit is required")
            .finish(),
        NodeType::Condition => {
            let checks = checks.require("condition_type", "Condition type is required");
            let checks = match config.text("condition_type").as_deref() {
                Some("has_tag") => checks.require("tag", "Condition needs a tag to check"),
                Some("opp_value_gt") => {
                    checks.require("opp_value", "Condition needs an opportunity value")
                }
                Some("contact_status") => {
                    checks.require("contact_status", "Condition needs a contact status")
                }
                _ => checks,
            };
            checks.finish()
        }
        NodeType::AddTag | NodeType::RemoveTag => checks.require("tag", "Tag is required").finish(),
        NodeType::AssignSalesperson => checks
            .require("salesperson", "Salesperson is required")
            .finish(),
        NodeType::MoveToCampaign => checks
            .require("campaign_id", "Campaign is required")
            .finish(),
        NodeType::ChangeStatus => checks
            .require("new_status", "New status is required")
            .finish(),
        NodeType::CreateOpportunity => checks
            .require("stage", "Opportunity stage is required")
            .finish(),
        NodeType::SendSms => checks.require("body", "SMS body is required").finish(),
        NodeType::SendVoicemail => checks
            .require("script", "Voicemail script is required")
            .finish(),
        NodeType::SendDm => checks.require("body", "DM body is required").finish(),
        NodeType::AddTask => checks.require("title", "Task title is required").finish(),
        NodeType::SendNotification => checks
            .require("message", "Notification message is required")
            .finish(),
        NodeType::CustomWebhook => checks.require("url", "Webhook URL is required").finish(),
        NodeType::StripeCharge => checks
            .require_positive("amount", "Charge amount must be greater than 0")
            .finish(),
        NodeType::GoogleSheets => checks
            .require("sheet_id", "Google Sheet is required")
            .finish(),
        _ => Vec::new(),
    }
}
