//! Allow-listed request parameters.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Attribute names a create or update may set. Anything else is dropped.
pub const PERMITTED_FIELDS: [&str; 3] = ["name", "species", "likes"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Submitted attribute values restricted to [`PERMITTED_FIELDS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BirdParams {
    values: Map<String, JsonValue>,
}

impl BirdParams {
    /// Filters a request body down to the permitted keys.
    pub fn permit(body: JsonValue) -> Result<Self, ParamsError> {
        match body {
            JsonValue::Object(map) => Ok(Self::from_map(map)),
            other => Err(ParamsError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn from_map(map: Map<String, JsonValue>) -> Self {
        let mut values = Map::new();
        for (key, value) in map {
            if PERMITTED_FIELDS.contains(&key.as_str()) {
                values.insert(key, value);
            } else {
                tracing::debug!(param = %key, "dropping unpermitted parameter");
            }
        }
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn permit_keeps_only_allow_listed_keys() {
        let params = BirdParams::permit(json!({
            "name": "Ruby",
            "species": "Archilochus colubris",
            "likes": 3,
            "id": 99,
            "admin": true,
            "created_at": "2020-01-01T00:00:00Z"
        }))
        .unwrap();

        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys.len(), 3);
        for field in PERMITTED_FIELDS {
            assert!(params.contains(field), "missing {}", field);
        }
        assert!(params.get("id").is_none());
        assert!(params.get("admin").is_none());
        assert_eq!(params.get("name"), Some(&json!("Ruby")));
    }

    #[test]
    fn permit_keeps_explicit_nulls() {
        let params = BirdParams::permit(json!({ "species": null })).unwrap();
        assert_eq!(params.get("species"), Some(&JsonValue::Null));
    }

    #[test]
    fn permit_of_only_unknown_keys_is_empty() {
        let params = BirdParams::permit(json!({ "wingspan": 12 })).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn permit_rejects_non_objects() {
        assert_eq!(
            BirdParams::permit(json!(["name"])),
            Err(ParamsError::NotAnObject("array"))
        );
        assert_eq!(
            BirdParams::permit(json!("Ruby")),
            Err(ParamsError::NotAnObject("string"))
        );
    }
}
