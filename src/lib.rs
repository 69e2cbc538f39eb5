pub mod api;
pub mod config;
pub mod error;
pub mod errors;
pub mod inference;
pub mod models;
pub mod validation;

pub use config::Config;
pub use error::{InferenceError, LoadError, ReloadError, ValidationError};
pub use errors::AppError;
