//! Task service for the geotask system.
//!
//! Coordinates the record store and geo index behind one API:
//! - create/update/delete with the dual-write protocol
//! - proximity search with stale-entry filtering

pub mod error;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use service::{NewTask, TaskService, TaskUpdate};
