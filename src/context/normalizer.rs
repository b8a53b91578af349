use super::{Contact, Context, Meta, Opportunity};
use crate::clock::Clock;
use crate::workflow::config::{is_truthy, value_as_number, value_as_text};
use crate::workflow::{Trigger, TriggerType};
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use tracing::debug;

type Fields = Map<String, Value>;

/// Maps a raw event payload onto the canonical [`Context`].
///
/// Never fails: every field has a default, so an empty or partial payload (or a
/// payload that is not a JSON object at all) still yields a complete context.
/// Contact and opportunity fields are read from nested `contact`/`opportunity`
/// objects when present, otherwise from the top level of the payload.
pub fn normalize(trigger: &Trigger, raw: &Value, clock: &dyn Clock) -> Context {
    let empty = Fields::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let triggered_at = field_text(fields, "triggered_at").unwrap_or_else(|| {
        clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    });

    let context = Context {
        trigger_type: trigger
            .kind()
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_default(),
        triggered_at,
        contact: normalize_contact(fields),
        opportunity: normalize_opportunity(fields),
        meta: normalize_meta(trigger, fields),
    };

    debug!(
        trigger_type = %context.trigger_type,
        contact_id = %context.contact.id,
        meta_fields = context.meta.len(),
        "Normalized trigger payload"
    );
    context
}

fn normalize_contact(fields: &Fields) -> Contact {
    let source = nested(fields, "contact");

    let name = text(source, "name");
    let (name_first, name_last) = name.split_once(' ').unwrap_or((name.as_str(), ""));
    let first_name = field_text(source, "first_name").unwrap_or_else(|| name_first.to_string());
    let last_name = field_text(source, "last_name").unwrap_or_else(|| name_last.to_string());

    Contact {
        id: field_text(source, "id")
            .or_else(|| field_text(source, "contact_id"))
            .unwrap_or_default(),
        email: text(source, "email"),
        first_name,
        last_name,
        company: text(source, "company"),
        phone: text(source, "phone"),
        tags: tags(source.get("tags")),
        status: text(source, "status"),
        contact_type: text(source, "contact_type"),
        assigned_salesperson: text(source, "assigned_salesperson"),
        campaign_id: text(source, "campaign_id"),
        ..Contact::default()
    }
}

fn normalize_opportunity(fields: &Fields) -> Opportunity {
    match fields.get("opportunity").and_then(Value::as_object) {
        Some(source) => Opportunity {
            id: text(source, "id"),
            stage: text(source, "stage"),
            value: number(source, "value"),
            status: text(source, "status"),
            pipeline: text(source, "pipeline"),
        },
        None => Opportunity {
            id: text(fields, "opportunity_id"),
            stage: text(fields, "stage"),
            value: field_number(fields, "value")
                .or_else(|| field_number(fields, "opportunity_value"))
                .unwrap_or(0.0),
            status: text(fields, "opportunity_status"),
            pipeline: text(fields, "pipeline"),
        },
    }
}

fn normalize_meta(trigger: &Trigger, fields: &Fields) -> Meta {
    let mut meta = Meta::new();

    // Engagement signals are injected by the caller; the engine does not track them.
    for flag in ["email_opened", "link_clicked"] {
        if let Some(value) = fields.get(flag) {
            meta.insert(flag.to_string(), Value::Bool(is_truthy(value)));
        }
    }
    if let Some(days) = field_number(fields, "days_since_last_contact") {
        meta.insert("days_since_last_contact".to_string(), days.into());
    }

    if let Some(condition) = &trigger.condition {
        meta.insert(
            "trigger_condition".to_string(),
            Value::Object(condition.clone()),
        );
    }

    let Some(kind) = trigger.kind() else {
        return meta;
    };

    let put_text = |meta: &mut Meta, key: &str| {
        meta.insert(key.to_string(), Value::String(text(fields, key)));
    };

    match kind {
        TriggerType::FormSubmission => {
            put_text(&mut meta, "form_id");
            let form_data = fields
                .get("form_data")
                .filter(|v| v.is_object())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            meta.insert("form_data".to_string(), form_data);
        }
        TriggerType::TagAdded | TriggerType::TagRemoved => put_text(&mut meta, "tag"),
        TriggerType::EmailOpened => {
            put_text(&mut meta, "campaign_id");
            meta.insert("email_opened".to_string(), Value::Bool(true));
        }
        TriggerType::LinkClicked => {
            put_text(&mut meta, "campaign_id");
            put_text(&mut meta, "link_url");
            meta.insert("link_clicked".to_string(), Value::Bool(true));
        }
        TriggerType::EmailReplied => {
            put_text(&mut meta, "campaign_id");
            put_text(&mut meta, "reply_text");
        }
        TriggerType::OpportunityStageChanged => {
            put_text(&mut meta, "previous_stage");
            put_text(&mut meta, "new_stage");
        }
        TriggerType::OpportunityCreated => put_text(&mut meta, "pipeline"),
        TriggerType::AppointmentBooked => {
            put_text(&mut meta, "appointment_id");
            put_text(&mut meta, "appointment_time");
        }
        TriggerType::PaymentReceived => {
            meta.insert("amount".to_string(), number(fields, "amount").into());
            put_text(&mut meta, "invoice_id");
        }
        TriggerType::Birthday => put_text(&mut meta, "birth_date"),
        TriggerType::ContactCreated | TriggerType::Manual | TriggerType::Custom(_) => {}
    }

    meta
}

/// The nested object under `key`, or the top-level fields when there is none.
fn nested<'a>(fields: &'a Fields, key: &str) -> &'a Fields {
    fields.get(key).and_then(Value::as_object).unwrap_or(fields)
}

fn field_text(fields: &Fields, key: &str) -> Option<String> {
    fields.get(key).and_then(value_as_text)
}

fn field_number(fields: &Fields, key: &str) -> Option<f64> {
    fields.get(key).and_then(value_as_number)
}

fn text(fields: &Fields, key: &str) -> String {
    field_text(fields, key).unwrap_or_default()
}

fn number(fields: &Fields, key: &str) -> f64 {
    field_number(fields, key).unwrap_or(0.0)
}

/// Reads tags from an array or a comma-separated string, dropping blanks and
/// duplicates while keeping first-seen order.
fn tags(value: Option<&Value>) -> Vec<String> {
    let candidates: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_text).collect(),
        Some(Value::String(list)) => list.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
