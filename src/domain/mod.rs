//! Domain types: the bird resource and validation outcomes.

pub mod bird;
pub mod validation;

pub use bird::{Bird, BirdAttributes, BirdParams, Changeset};
pub use validation::{ErrorPayload, ErrorShape, ValidationErrors, ValidationResult};
