//! Geographic positions and coordinate validation.
//!
//! The proximity-query contract is fixed to kilometers; every radius that
//! enters the system passes through [`parse_radius_km`] or
//! [`validate_radius_km`] before it reaches a store adapter.

use crate::error::{Error, Result};
use crate::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};

/// A validated geographic position.
///
/// Construction goes through [`GeoPoint::new`], which enforces the WGS84
/// coordinate ranges: latitude in [-90, 90], longitude in [-180, 180].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidLatitude(format!(
                "{lat} (must be between -90 and 90)"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::InvalidLongitude(format!(
                "{lng} (must be between -180 and 180)"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Build an optional position from a lat/lng pair.
    ///
    /// Both coordinates must be supplied together; a lone latitude or
    /// longitude is rejected rather than silently defaulted.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(Some(Self::new(lat, lng)?)),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::InvalidPosition(
                "latitude supplied without longitude".to_string(),
            )),
            (None, Some(_)) => Err(Error::InvalidPosition(
                "longitude supplied without latitude".to_string(),
            )),
        }
    }

    /// Great-circle distance to another position in kilometers (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_KM * c
    }
}

/// Parse a textual latitude, identifying the field on failure.
pub fn parse_latitude(input: &str) -> Result<f64> {
    let lat: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidLatitude(format!("not a number: {input:?}")))?;
    // Range check through the same path as constructed positions.
    GeoPoint::new(lat, 0.0)?;
    Ok(lat)
}

/// Parse a textual longitude, identifying the field on failure.
pub fn parse_longitude(input: &str) -> Result<f64> {
    let lng: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidLongitude(format!("not a number: {input:?}")))?;
    GeoPoint::new(0.0, lng)?;
    Ok(lng)
}

/// Parse a textual radius in kilometers.
pub fn parse_radius_km(input: &str) -> Result<f64> {
    let radius: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidRadius(format!("not a number: {input:?}")))?;
    validate_radius_km(radius)
}

/// Validate an already-numeric radius: finite and strictly positive.
pub fn validate_radius_km(radius: f64) -> Result<f64> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius(format!(
            "{radius} (must be a positive number of kilometers)"
        )));
    }
    Ok(radius)
}
