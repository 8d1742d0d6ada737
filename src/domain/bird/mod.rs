//! The `Bird` resource: its record shape, attributes and declared rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod changeset;
pub mod params;

pub use changeset::{BirdAttributes, Changeset};
pub use params::{BirdParams, ParamsError, PERMITTED_FIELDS};

/// A persisted bird, as returned by the store and serialized in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Bird {
    pub id: i64,
    pub name: String,
    pub species: Option<String>,
    pub likes: i32,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// Writable attributes of a bird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Name,
    Species,
    Likes,
}

impl Attribute {
    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Species => "species",
            Attribute::Likes => "likes",
        }
    }
}

/// A named predicate that must hold for a write to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value casts to text (or null).
    Text,
    /// Value casts to an integer.
    Integer,
    /// Value fits a 32-bit signed integer column.
    Int32Range,
    /// Value is not null, empty or whitespace.
    Presence,
    /// No other bird carries the same value.
    Uniqueness,
}

/// Bird validation rules, in evaluation (and reporting) order.
pub const BIRD_RULES: &[(Attribute, Rule)] = &[
    (Attribute::Name, Rule::Text),
    (Attribute::Name, Rule::Presence),
    (Attribute::Name, Rule::Uniqueness),
    (Attribute::Species, Rule::Text),
    (Attribute::Likes, Rule::Integer),
    (Attribute::Likes, Rule::Int32Range),
];

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "has already been taken";
pub const INVALID: &str = "is invalid";
pub const NOT_A_NUMBER: &str = "is not a number";
pub const NOT_AN_INTEGER: &str = "must be an integer";
pub const OUT_OF_RANGE: &str = "is out of range";
