use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines a string-backed kind enum: every known name gets a variant, anything
/// else is kept verbatim in `Custom`. Serializes as the plain name.
macro_rules! define_kinds {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A name this crate has no built-in knowledge of.
            Custom(String),
        }

        impl $name {
            /// The wire name of this kind.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $text, )*
                    $name::Custom(name) => name,
                }
            }

            /// All built-in names, in declaration order.
            pub fn builtin_names() -> &'static [&'static str] {
                &[ $( $text, )* ]
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                match name.as_str() {
                    $( $text => $name::$variant, )*
                    _ => $name::Custom(name),
                }
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::from(name.to_string())
            }
        }

        impl From<$name> for String {
            fn from(kind: $name) -> String {
                kind.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_kinds! {
    /// The event that starts a workflow run.
    TriggerType {
        ContactCreated => "contact_created",
        Manual => "manual",
        FormSubmission => "form_submission",
        TagAdded => "tag_added",
        TagRemoved => "tag_removed",
        EmailOpened => "email_opened",
        LinkClicked => "link_clicked",
        EmailReplied => "email_replied",
        OpportunityStageChanged => "opportunity_stage_changed",
        OpportunityCreated => "opportunity_created",
        AppointmentBooked => "appointment_booked",
        PaymentReceived => "payment_received",
        Birthday => "birthday",
    }
}

define_kinds! {
    /// The type of a workflow node. Selects the handler, the validation rules
    /// and the shape of the node's config.
    NodeType {
        // Flow
        Wait => "wait",
        Condition => "condition",

        // Channels
        SendEmail => "send_email",
        SendSms => "send_sms",
        SendVoicemail => "send_voicemail",
        SendDm => "send_dm",
        SendReviewRequest => "send_review_request",
        SendNotification => "send_notification",

        // Contact state
        AddTag => "add_tag",
        RemoveTag => "remove_tag",
        ChangeStatus => "change_status",
        UpdateContact => "update_contact",
        AssignSalesperson => "assign_salesperson",
        MoveToCampaign => "move_to_campaign",
        AddNote => "add_note",
        AddTask => "add_task",
        AddToWorkflow => "add_to_workflow",
        RemoveFromWorkflow => "remove_from_workflow",

        // Pipeline
        CreateOpportunity => "create_opportunity",
        UpdateOpportunity => "update_opportunity",

        // Integrations
        CustomWebhook => "custom_webhook",
        StripeCharge => "stripe_charge",
        GoogleSheets => "google_sheets",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_kept_verbatim() {
        let kind = NodeType::from("send_fax");
        assert_eq!(kind, NodeType::Custom("send_fax".to_string()));
        assert_eq!(kind.as_str(), "send_fax");
    }

    #[test]
    fn kinds_serialize_as_plain_names() {
        let json = serde_json::to_string(&TriggerType::TagAdded).unwrap();
        assert_eq!(json, "\"tag_added\"");
        let parsed: NodeType = serde_json::from_str("\"stripe_charge\"").unwrap();
        assert_eq!(parsed, NodeType::StripeCharge);
    }
}
