//! Service error types.

use geotask_core::TaskId;
use geotask_store::StoreError;
use thiserror::Error;

/// Task service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error(transparent)]
    InvalidArgument(#[from] geotask_core::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
