use super::template::{interpolate, truncate_chars};
use super::{ExecutionScope, NodeHandler, Outcome};
use crate::condition;
use crate::context::Context;
use crate::error::NodeError;
use crate::executor::Branch;
use crate::mutator;
use crate::workflow::Node;
use ahash::AHashMap;
use serde_json::json;

const EMAIL_PREVIEW_CHARS: usize = 120;
const SMS_MAX_CHARS: usize = 160;

/// Master macro to define the built-in handlers, their registration, and their
/// creation by name.
macro_rules! define_node_handlers {
    ( $( ($struct_name:ident, $node_type:literal, $run:ident) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl NodeHandler for $struct_name {
                fn node_type(&self) -> &str { $node_type }
                fn handle(
                    &self,
                    node: &Node,
                    context: &Context,
                    scope: &ExecutionScope<'_>,
                ) -> Result<Outcome, NodeError> {
                    $run(node, context, scope)
                }
            }
        )*

        pub(crate) fn register_default_handlers(registry: &mut AHashMap<String, Box<dyn NodeHandler>>) {
            $( registry.insert($node_type.to_string(), Box::new($struct_name)); )*
        }

        pub(crate) fn create_handler_by_name(name: &str) -> Option<Box<dyn NodeHandler>> {
            match name {
                $( $node_type => Some(Box::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

define_node_handlers! {
    // Flow
    (WaitHandler, "wait", wait),
    (ConditionHandler, "condition", evaluate_condition),

    // Channels
    (SendEmailHandler, "send_email", send_email),
    (SendSmsHandler, "send_sms", send_sms),
    (SendVoicemailHandler, "send_voicemail", send_voicemail),
    (SendDmHandler, "send_dm", send_dm),
    (SendReviewRequestHandler, "send_review_request", send_review_request),
    (SendNotificationHandler, "send_notification", send_notification),

    // Integrations
    (CustomWebhookHandler, "custom_webhook", custom_webhook),
    (StripeChargeHandler, "stripe_charge", stripe_charge),
    (GoogleSheetsHandler, "google_sheets", google_sheets),

    // Annotations
    (AddToWorkflowHandler, "add_to_workflow", annotate),
    (RemoveFromWorkflowHandler, "remove_from_workflow", annotate),
    (AddTaskHandler, "add_task", annotate),
    (AddNoteHandler, "add_note", annotate),
}

fn wait(node: &Node, _context: &Context, _scope: &ExecutionScope<'_>) -> Result<Outcome, NodeError> {
    let config = &node.config;
    let days = config.number("wait_days").unwrap_or(0.0);
    let unit = config.text("wait_unit").unwrap_or_default();

    let mut description = format!("Wait {} {}", days, unit);
    let mut output = json!({ "wait_days": days, "wait_unit": unit });
    if let Some(at) = config.text("send_at_time") {
        description.push_str(&format!(", then continue at {}", at));
        output["send_at_time"] = json!(at);
    }
    output["description"] = json!(description);

    Ok(Outcome::described(output))
}

fn evaluate_condition(
    node: &Node,
    context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let result = condition::evaluate(node, context);
    let branch = Branch::from(result);
    let condition_type = node.config.text("condition_type").unwrap_or_default();

    Ok(Outcome {
        context: None,
        output: json!({
            "description": format!("Condition '{}' evaluated to {}", condition_type, branch),
            "condition_type": condition_type,
            "result": result,
        }),
        branch: Some(branch),
    })
}

fn send_email(node: &Node, context: &Context, scope: &ExecutionScope<'_>) -> Result<Outcome, NodeError> {
    let config = &node.config;
    let contact = &context.contact;
    let current_date = scope.clock.now().format("%Y-%m-%d").to_string();
    let vars = [
        ("first_name", first_name_or_there(context)),
        ("company", contact.company.as_str()),
        ("lead_email", contact.email.as_str()),
        ("current_date", current_date.as_str()),
    ];

    let template_id = config.text("template_id");
    let subject = match (config.text("subject"), &template_id) {
        (Some(subject), _) => interpolate(&subject, &vars),
        (None, Some(id)) => format!("Template {}", id),
        (None, None) => String::new(),
    };
    let body = config
        .text("body")
        .map(|body| interpolate(&body, &vars))
        .unwrap_or_default();

    let mut output = json!({
        "description": format!("Email would be sent to {}", recipient(&contact.email)),
        "to": contact.email,
        "subject": subject,
        "body_preview": truncate_chars(&body, EMAIL_PREVIEW_CHARS),
    });
    if let Some(id) = template_id {
        output["template_id"] = json!(id);
    }
    Ok(Outcome::described(output))
}

fn send_sms(node: &Node, context: &Context, _scope: &ExecutionScope<'_>) -> Result<Outcome, NodeError> {
    let contact = &context.contact;
    let vars = [
        ("first_name", first_name_or_there(context)),
        ("company", contact.company.as_str()),
    ];
    let body = node.config.text("body").unwrap_or_default();
    let message = truncate_chars(&interpolate(&body, &vars), SMS_MAX_CHARS);

    Ok(Outcome::described(json!({
        "description": format!("SMS would be sent to {}", recipient(&contact.phone)),
        "to": contact.phone,
        "message": message,
    })))
}

fn send_voicemail(
    node: &Node,
    context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let script = node.config.text("script").unwrap_or_default();
    Ok(Outcome::described(json!({
        "description": format!(
            "Ringless voicemail dispatched to {}",
            recipient(&context.contact.phone)
        ),
        "to": context.contact.phone,
        "script_preview": truncate_chars(&script, EMAIL_PREVIEW_CHARS),
    })))
}

fn send_dm(node: &Node, context: &Context, _scope: &ExecutionScope<'_>) -> Result<Outcome, NodeError> {
    let platform = node
        .config
        .text("platform")
        .unwrap_or_else(|| "social".to_string());
    Ok(Outcome::described(json!({
        "description": format!(
            "Direct message dispatched to {} via {}",
            display_name(context),
            platform
        ),
        "platform": platform,
        "message": node.config.text("body").unwrap_or_default(),
    })))
}

fn send_review_request(
    node: &Node,
    context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let mut output = json!({
        "description": format!(
            "Review request dispatched to {}",
            recipient(&context.contact.email)
        ),
        "to": context.contact.email,
    });
    if let Some(link) = node.config.text("review_link") {
        output["review_link"] = json!(link);
    }
    Ok(Outcome::described(output))
}

fn send_notification(
    node: &Node,
    _context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let recipient = node
        .config
        .text("recipient")
        .unwrap_or_else(|| "team".to_string());
    Ok(Outcome::described(json!({
        "description": format!("Internal notification dispatched to {}", recipient),
        "recipient": recipient,
        "message": node.config.text("message").unwrap_or_default(),
    })))
}

fn custom_webhook(
    node: &Node,
    _context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let url = node.config.text("url").unwrap_or_default();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(NodeError::InvalidConfig {
            node_id: node.id.clone(),
            field: "url".to_string(),
            message: format!("'{}' is not an http(s) URL", url),
        });
    }
    let method = node
        .config
        .text("method")
        .map(|m| m.to_uppercase())
        .unwrap_or_else(|| "POST".to_string());

    Ok(Outcome::described(json!({
        "description": format!("Would call {} {}", method, url),
        "method": method,
        "url": url,
    })))
}

fn stripe_charge(
    node: &Node,
    context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let amount = node.config.number("amount").unwrap_or(0.0);
    let currency = node
        .config
        .text("currency")
        .map(|c| c.to_lowercase())
        .unwrap_or_else(|| "usd".to_string());

    Ok(Outcome::described(json!({
        "description": format!(
            "Would charge {:.2} {} to {}",
            amount,
            currency.to_uppercase(),
            recipient(&context.contact.email)
        ),
        "amount": amount,
        "currency": currency,
    })))
}

fn google_sheets(
    node: &Node,
    _context: &Context,
    _scope: &ExecutionScope<'_>,
) -> Result<Outcome, NodeError> {
    let sheet_id = node.config.text("sheet_id").unwrap_or_default();
    let action = node
        .config
        .text("action")
        .unwrap_or_else(|| "append_row".to_string());

    Ok(Outcome::described(json!({
        "description": format!("Would {} in Google Sheet '{}'", action.replace('_', " "), sheet_id),
        "sheet_id": sheet_id,
        "action": action,
    })))
}

/// Nodes that only record an annotation: apply the mutation, then describe it.
fn annotate(node: &Node, context: &Context, _scope: &ExecutionScope<'_>) -> Result<Outcome, NodeError> {
    let next = mutator::apply(node, context);
    Ok(Outcome::updated(
        next,
        json!({ "description": mutator::describe(node) }),
    ))
}

fn first_name_or_there(context: &Context) -> &str {
    match context.contact.first_name.as_str() {
        "" => "there",
        name => name,
    }
}

fn display_name(context: &Context) -> String {
    match context.contact.full_name() {
        name if name.is_empty() => recipient(&context.contact.email).to_string(),
        name => name,
    }
}

fn recipient(address: &str) -> &str {
    if address.is_empty() { "(no address on file)" } else { address }
}

