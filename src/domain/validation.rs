//! Validation outcomes and the error payloads they turn into.
//!
//! A write against a model yields a [`ValidationResult`]: either the committed
//! entity, or every rule violation found in one pass. How violations are shown to
//! clients is decided once per deployment by [`ErrorShape`].

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Outcome of an attempted create or update.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    /// All rules passed and the write was committed.
    Success(T),
    /// At least one rule failed; nothing was committed.
    Failure(ValidationErrors),
}

impl<T> ValidationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success(_))
    }

    pub fn into_result(self) -> Result<T, ValidationErrors> {
        match self {
            ValidationResult::Success(v) => Ok(v),
            ValidationResult::Failure(e) => Err(e),
        }
    }
}

/// Attribute name -> messages, in the order the attributes were first reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` under `attribute`, keeping first-seen attribute order.
    pub fn add(&mut self, attribute: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(k, _)| k == attribute) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((attribute.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, attribute: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == attribute)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flattens into `"<Human attribute> <message>"` strings, e.g. `"Name can't be blank"`.
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(attribute, messages)| {
                let human = humanize(attribute);
                messages
                    .iter()
                    .map(move |m| format!("{} {}", human, m))
            })
            .collect()
    }

    pub fn into_payload(self, shape: ErrorShape) -> ErrorPayload {
        match shape {
            ErrorShape::Messages => ErrorPayload::Messages(self),
            ErrorShape::FullMessages => ErrorPayload::FullMessages(self.full_messages()),
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (attribute, messages) in &self.entries {
            map.serialize_entry(attribute, messages)?;
        }
        map.end()
    }
}

/// `likes_count` -> `Likes count`.
pub fn humanize(attribute: &str) -> String {
    let spaced = attribute.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deployment-wide choice of how validation failures are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorShape {
    /// `{"name": ["can't be blank"]}`
    #[default]
    Messages,
    /// `["Name can't be blank"]`
    FullMessages,
}

impl FromStr for ErrorShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "messages" => Ok(ErrorShape::Messages),
            "full_messages" => Ok(ErrorShape::FullMessages),
            other => Err(format!(
                "unknown error format '{}' (expected 'messages' or 'full_messages')",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorShape::Messages => f.write_str("messages"),
            ErrorShape::FullMessages => f.write_str("full_messages"),
        }
    }
}

/// The value placed under `"errors"` in a 422 body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Messages(ValidationErrors),
    FullMessages(Vec<String>),
}
