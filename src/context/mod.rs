//! The canonical state threaded through a workflow run.
//!
//! A [`Context`] is never mutated in place by the engine. Every state change goes
//! through the consuming `with_*` methods on a fresh copy, so a step's recorded
//! snapshot stays valid after later steps run.

use crate::workflow::config::value_as_text;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub mod normalizer;

pub use normalizer::normalize;

/// Trigger-specific fields plus execution-time annotations.
pub type Meta = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub trigger_type: String,
    pub triggered_at: String,
    pub contact: Contact,
    pub opportunity: Opportunity,
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub phone: String,
    /// Set semantics: never holds the same tag twice.
    pub tags: Vec<String>,
    pub status: String,
    pub contact_type: String,
    pub assigned_salesperson: String,
    pub campaign_id: String,
    /// Fields written by `update_contact` that have no dedicated slot. Kept as a
    /// nested object so a free-form name can never collide with a typed field.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    pub id: String,
    pub stage: String,
    pub value: f64,
    pub status: String,
    pub pipeline: String,
}

impl Context {
    pub fn with_contact(mut self, update: impl FnOnce(Contact) -> Contact) -> Self {
        self.contact = update(self.contact);
        self
    }

    pub fn with_opportunity(mut self, update: impl FnOnce(Opportunity) -> Opportunity) -> Self {
        self.opportunity = update(self.opportunity);
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }

    pub fn meta_flag(&self, key: &str) -> bool {
        self.meta.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn meta_number(&self, key: &str) -> Option<f64> {
        self.meta.get(key).and_then(Value::as_f64)
    }
}

impl Contact {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Adds `tag` unless it is already present.
    pub fn with_tag(mut self, tag: &str) -> Self {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
        self
    }

    pub fn without_tag(mut self, tag: &str) -> Self {
        self.tags.retain(|t| t != tag);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn with_salesperson(mut self, salesperson: &str) -> Self {
        self.assigned_salesperson = salesperson.to_string();
        self
    }

    pub fn with_campaign(mut self, campaign_id: &str) -> Self {
        self.campaign_id = campaign_id.to_string();
        self
    }

    /// Writes an arbitrary field by name. Names with a dedicated slot update that
    /// slot; `tags` and unknown names land in `extra`.
    pub fn with_field(mut self, field: &str, value: Value) -> Self {
        let text = value_as_text(&value).unwrap_or_default();
        match field {
            "id" => self.id = text,
            "email" => self.email = text,
            "first_name" => self.first_name = text,
            "last_name" => self.last_name = text,
            "company" => self.company = text,
            "phone" => self.phone = text,
            "status" => self.status = text,
            "contact_type" => self.contact_type = text,
            "assigned_salesperson" => self.assigned_salesperson = text,
            "campaign_id" => self.campaign_id = text,
            _ => {
                self.extra.insert(field.to_string(), value);
            }
        }
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Opportunity {
    /// A fresh, active opportunity.
    pub fn created(stage: &str, value: f64, pipeline: &str) -> Self {
        Self {
            id: String::new(),
            stage: stage.to_string(),
            value,
            status: "active".to_string(),
            pipeline: pipeline.to_string(),
        }
    }

    pub fn with_stage(mut self, stage: &str) -> Self {
        self.stage = stage.to_string();
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
}
