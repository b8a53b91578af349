use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;

/// Raw event payloads to run a workflow against.
///
/// On disk this is either a single payload object or an array of them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct SampleEvents {
    pub payloads: Vec<Value>,
}

impl SampleEvents {
    /// Load payloads from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let payloads = match serde_json::from_str::<Value>(json)? {
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(Self { payloads })
    }

    /// A single demo contact, used when no payload file is provided.
    pub fn demo() -> Self {
        Self {
            payloads: vec![json!({
                "contact_id": "demo-contact",
                "email": "jane@example.com",
                "name": "Jane Doe",
                "company": "Acme Inc",
                "phone": "+15550100",
                "tags": ["lead"],
                "status": "new",
            })],
        }
    }

    pub fn payloads(&self) -> &[Value] {
        &self.payloads
    }
}
