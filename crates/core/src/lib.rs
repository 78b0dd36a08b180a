//! Core domain types and shared logic for the geotask service.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Task records and identifiers
//! - Geographic positions and coordinate validation
//! - Radius parsing for proximity queries
//! - Configuration types

pub mod config;
pub mod error;
pub mod geo;
pub mod task;

pub use error::{Error, Result};
pub use geo::{parse_latitude, parse_longitude, parse_radius_km, validate_radius_km, GeoPoint};
pub use task::{Task, TaskId};

/// Mean Earth radius in kilometers, used for great-circle distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
