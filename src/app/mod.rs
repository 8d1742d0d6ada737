pub mod bird_service;
pub mod error;

pub use bird_service::BirdService;
pub use error::ApiError;
