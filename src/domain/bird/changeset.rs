//! Casting permitted params onto a bird and evaluating [`BIRD_RULES`].

use super::{
    Attribute, Bird, BirdParams, Rule, BIRD_RULES, BLANK, INVALID, NOT_AN_INTEGER, NOT_A_NUMBER,
    OUT_OF_RANGE, TAKEN,
};
use crate::domain::validation::{ValidationErrors, ValidationResult};
use serde_json::Value as JsonValue;

/// Validated attribute values, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirdAttributes {
    pub name: String,
    pub species: Option<String>,
    pub likes: i32,
}

/// Candidate values for one write, with per-attribute cast failures kept aside.
#[derive(Debug, Clone, PartialEq)]
pub struct Changeset {
    name: Result<Option<String>, &'static str>,
    species: Result<Option<String>, &'static str>,
    likes: Result<i64, &'static str>,
}

impl Changeset {
    /// Starts from an empty bird (`likes` defaults to 0).
    pub fn for_create(params: &BirdParams) -> Self {
        let base = Self {
            name: Ok(None),
            species: Ok(None),
            likes: Ok(0),
        };
        base.apply(params)
    }

    /// Starts from `bird`; only submitted keys change.
    pub fn for_update(bird: &Bird, params: &BirdParams) -> Self {
        let base = Self {
            name: Ok(Some(bird.name.clone())),
            species: Ok(bird.species.clone()),
            likes: Ok(i64::from(bird.likes)),
        };
        base.apply(params)
    }

    fn apply(mut self, params: &BirdParams) -> Self {
        if let Some(v) = params.get(Attribute::Name.as_str()) {
            self.name = cast_text(v);
        }
        if let Some(v) = params.get(Attribute::Species.as_str()) {
            self.species = cast_text(v);
        }
        if let Some(v) = params.get(Attribute::Likes.as_str()) {
            self.likes = cast_integer(v);
        }
        self
    }

    /// The name the uniqueness rule has to check, if it will be checked at all.
    pub fn name_to_check(&self) -> Option<&str> {
        match &self.name {
            Ok(Some(name)) if !is_blank(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Runs every rule and collects all violations.
    ///
    /// `name_taken` is the store's answer for [`Self::name_to_check`]. Once an
    /// attribute fails its type rule its remaining rules are skipped.
    pub fn validate(self, name_taken: bool) -> ValidationResult<BirdAttributes> {
        let mut errors = ValidationErrors::new();
        for &(attribute, rule) in BIRD_RULES {
            if let Some(message) = self.check(attribute, rule, name_taken) {
                errors.add(attribute.as_str(), message);
            }
        }

        if !errors.is_empty() {
            return ValidationResult::Failure(errors);
        }

        match (self.name, self.species, self.likes) {
            (Ok(Some(name)), Ok(species), Ok(likes)) => match i32::try_from(likes) {
                Ok(likes) => ValidationResult::Success(BirdAttributes {
                    name,
                    species,
                    likes,
                }),
                Err(_) => failure(Attribute::Likes, OUT_OF_RANGE),
            },
            // Unreachable: the rules above reject every other combination.
            _ => failure(Attribute::Name, BLANK),
        }
    }

    fn check(&self, attribute: Attribute, rule: Rule, name_taken: bool) -> Option<&'static str> {
        match (attribute, rule) {
            (Attribute::Name, Rule::Text) => self.name.as_ref().err().copied(),
            (Attribute::Name, Rule::Presence) => match &self.name {
                Ok(None) => Some(BLANK),
                Ok(Some(name)) if is_blank(name) => Some(BLANK),
                _ => None,
            },
            (Attribute::Name, Rule::Uniqueness) => {
                (name_taken && self.name_to_check().is_some()).then_some(TAKEN)
            }
            (Attribute::Species, Rule::Text) => self.species.as_ref().err().copied(),
            (Attribute::Likes, Rule::Integer) => self.likes.err(),
            (Attribute::Likes, Rule::Int32Range) => match self.likes {
                Ok(n) if i32::try_from(n).is_err() => Some(OUT_OF_RANGE),
                _ => None,
            },
            _ => None,
        }
    }
}

impl BirdAttributes {
    pub fn differs_from(&self, bird: &Bird) -> bool {
        self.name != bird.name || self.species != bird.species || self.likes != bird.likes
    }
}

fn failure<T>(attribute: Attribute, message: &str) -> ValidationResult<T> {
    let mut errors = ValidationErrors::new();
    errors.add(attribute.as_str(), message);
    ValidationResult::Failure(errors)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Text columns take strings; numbers and bools are stringified.
fn cast_text(v: &JsonValue) -> Result<Option<String>, &'static str> {
    match v {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s.clone())),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        JsonValue::Bool(b) => Ok(Some(b.to_string())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(INVALID),
    }
}

/// Integer columns take JSON integers or integer strings (e.g. `"12"`).
fn cast_integer(v: &JsonValue) -> Result<i64, &'static str> {
    match v {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(OUT_OF_RANGE)
            } else {
                Err(NOT_AN_INTEGER)
            }
        }
        JsonValue::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Ok(i)
            } else if s.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                Err(NOT_AN_INTEGER)
            } else {
                Err(NOT_A_NUMBER)
            }
        }
        _ => Err(NOT_A_NUMBER),
    }
}
