use crate::context::{Context, Opportunity};
use crate::workflow::{Node, NodeType};
use serde_json::{Value, json};

/// Applies a state-changing node to a context.
///
/// Returns a new, independent context with exactly one logical change; the input
/// is never touched. Channel and integration nodes, and types this function does
/// not know, return an unchanged copy.
pub fn apply(node: &Node, context: &Context) -> Context {
    let config = &node.config;
    let text = |key: &str| config.text(key).unwrap_or_default();
    let next = context.clone();

    match node.node_type {
        NodeType::AddTag => match config.text("tag") {
            Some(tag) => next.with_contact(|c| c.with_tag(&tag)),
            None => next,
        },
        NodeType::RemoveTag => match config.text("tag") {
            Some(tag) => next.with_contact(|c| c.without_tag(&tag)),
            None => next,
        },
        NodeType::ChangeStatus => next.with_contact(|c| c.with_status(&text("new_status"))),
        NodeType::UpdateContact => match config.text("field") {
            Some(field) => {
                let value = config
                    .get("field_value")
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                next.with_contact(|c| c.with_field(&field, value))
            }
            None => next,
        },
        NodeType::AssignSalesperson => {
            next.with_contact(|c| c.with_salesperson(&text("salesperson")))
        }
        NodeType::CreateOpportunity => {
            let value = config.number("value").unwrap_or(0.0);
            next.with_opportunity(|_| {
                Opportunity::created(&text("stage"), value, &text("pipeline"))
            })
        }
        NodeType::UpdateOpportunity => next.with_opportunity(|mut opportunity| {
            if let Some(stage) = config.text("stage") {
                opportunity = opportunity.with_stage(&stage);
            }
            if let Some(status) = config.text("status") {
                opportunity = opportunity.with_status(&status);
            }
            opportunity
        }),
        NodeType::MoveToCampaign => {
            let campaign_id = text("campaign_id");
            next.with_contact(|c| c.with_campaign(&campaign_id))
                .with_meta("moved_to_campaign", campaign_id.as_str())
        }
        NodeType::AddNote => next.with_meta("last_note", text("note")),
        NodeType::AddTask => {
            let mut task = json!({ "title": text("title") });
            if let Some(due_days) = config.number("due_days") {
                task["due_days"] = json!(due_days);
            }
            next.with_meta("last_task", task)
        }
        NodeType::SendNotification => next.with_meta("last_notification", text("message")),
        NodeType::AddToWorkflow => next.with_meta("added_to_workflow", text("workflow_id")),
        NodeType::RemoveFromWorkflow => {
            next.with_meta("removed_from_workflow", text("workflow_id"))
        }
        _ => next,
    }
}

/// A one-line, human-readable account of what [`apply`] does for this node.
pub fn describe(node: &Node) -> String {
    let config = &node.config;
    let text = |key: &str| config.text(key).unwrap_or_default();

    match node.node_type {
        NodeType::AddTag => format!("Added tag '{}'", text("tag")),
        NodeType::RemoveTag => format!("Removed tag '{}'", text("tag")),
        NodeType::ChangeStatus => format!("Changed contact status to '{}'", text("new_status")),
        NodeType::UpdateContact => {
            format!("Set contact field '{}' to '{}'", text("field"), text("field_value"))
        }
        NodeType::AssignSalesperson => format!("Assigned salesperson '{}'", text("salesperson")),
        NodeType::CreateOpportunity => format!(
            "Created opportunity in stage '{}' worth {}",
            text("stage"),
            config.number("value").unwrap_or(0.0)
        ),
        NodeType::UpdateOpportunity => {
            let changes: Vec<String> = ["stage", "status"]
                .into_iter()
                .filter_map(|key| config.text(key).map(|v| format!("{} = '{}'", key, v)))
                .collect();
            if changes.is_empty() {
                "Opportunity left unchanged".to_string()
            } else {
                format!("Updated opportunity: {}", changes.join(", "))
            }
        }
        NodeType::MoveToCampaign => format!("Moved contact to campaign '{}'", text("campaign_id")),
        NodeType::AddNote => format!("Added note: {}", text("note")),
        NodeType::AddTask => format!("Created task '{}'", text("title")),
        NodeType::SendNotification => format!("Recorded notification: {}", text("message")),
        NodeType::AddToWorkflow => format!("Added contact to workflow '{}'", text("workflow_id")),
        NodeType::RemoveFromWorkflow => {
            format!("Removed contact from workflow '{}'", text("workflow_id"))
        }
        _ => format!("No state change for node type '{}'", node.node_type),
    }
}
