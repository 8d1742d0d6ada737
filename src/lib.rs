pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ApiError, BirdService};
pub use domain::{Bird, BirdParams, ErrorShape, ValidationErrors, ValidationResult};
pub use infra::Config;
pub use storage::{BirdStore, MemoryBirdStore, PgBirdStore, StoreError};
