//! Wire models of the configuration API

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::descriptor::ListShape;

/// Summary of one remote object as returned by a list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Synthetic APIs call this `entityId`
    #[serde(alias = "entityId")]
    pub id: String,
    pub name: String,
}

impl Value {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Value {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Server-confirmed result of a create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynatraceEntity {
    #[serde(alias = "entityId", alias = "applicationId")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DynatraceEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        DynatraceEntity {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Decode a list response body according to the family's envelope.
///
/// Entries without a `name` are skipped; they cannot take part in name
/// resolution anyway. A named entry that does not decode fails the whole list,
/// since dropping it would make the name look absent.
pub fn parse_values(body: &[u8], shape: &ListShape) -> Result<Vec<Value>, serde_json::Error> {
    let root: JsonValue = serde_json::from_slice(body)?;

    let items = match shape {
        ListShape::Array => root,
        ListShape::Keyed(key) => match root {
            JsonValue::Object(mut obj) => obj.remove(key).unwrap_or(JsonValue::Array(Vec::new())),
            other => other,
        },
    };

    let entries: Vec<JsonValue> = serde_json::from_value(items)?;
    entries
        .into_iter()
        .filter(|entry| !entry.get("name").is_none_or(JsonValue::is_null))
        .map(serde_json::from_value::<Value>)
        .collect()
}
