use crate::context::Context;
use crate::workflow::Node;
use tracing::warn;

/// Days without contact after which `no_response` holds, unless the node overrides it.
pub const DEFAULT_NO_RESPONSE_DAYS: f64 = 3.0;

/// Evaluates a `condition` node against the current context.
///
/// Pure and deterministic. Engagement checks (`email_opened`, `link_clicked`) read
/// flags the caller injected into `meta`; a missing flag counts as `false`.
/// An unknown or unset `condition_type` evaluates to `true`.
pub fn evaluate(node: &Node, context: &Context) -> bool {
    let config = &node.config;
    let condition_type = config.text("condition_type").unwrap_or_default();

    match condition_type.as_str() {
        "has_tag" => config
            .text("tag")
            .is_some_and(|tag| context.contact.has_tag(&tag)),
        "email_opened" => context.meta_flag("email_opened"),
        "link_clicked" => context.meta_flag("link_clicked"),
        "no_response" => {
            let threshold = config
                .number("no_response_days")
                .filter(|days| *days > 0.0)
                .unwrap_or(DEFAULT_NO_RESPONSE_DAYS);
            let days = context.meta_number("days_since_last_contact").unwrap_or(0.0);
            days >= threshold
        }
        "opp_value_gt" => config
            .number("opp_value")
            .is_some_and(|threshold| context.opportunity.value > threshold),
        "contact_status" => {
            context.contact.status == config.text("contact_status").unwrap_or_default()
        }
        other => {
            warn!(
                node_id = %node.id,
                condition_type = other,
                "Unknown condition type, treating it as satisfied"
            );
            true
        }
    }
}
