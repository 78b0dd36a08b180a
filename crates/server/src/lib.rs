//! HTTP API server for the geotask service.
//!
//! This crate provides the HTTP control plane:
//! - Task create/update/delete endpoints
//! - Proximity search endpoint
//! - Access gate middleware
//! - Health and metrics endpoints

pub mod auth;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use auth::{AccessGate, AuthenticatedUser, StaticTokenGate, TraceId, UserId};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
