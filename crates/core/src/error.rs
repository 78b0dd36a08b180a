//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid latitude: {0}")]
    InvalidLatitude(String),

    #[error("invalid longitude: {0}")]
    InvalidLongitude(String),

    #[error("invalid radius: {0}")]
    InvalidRadius(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid task id: {0}")]
    InvalidTaskId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
