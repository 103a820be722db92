//! LocationSample domain entity
//!
//! This module defines the LocationSample entity, one timestamped
//! geographic reading with optional quality metadata. Samples are
//! validated at the boundary that first sees them; a sample failing
//! validation is never stored or transmitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Lowest altitude (meters) accepted as plausible. The deepest point on
/// Earth is around -11,000 m; anything below -10,000 m is treated as a
/// sensor glitch.
const MIN_PLAUSIBLE_ALTITUDE: f64 = -10_000.0;

/// One observed geographic position
///
/// Latitude/longitude are decimal degrees; the optional quality fields
/// carry whatever the underlying location source reported. `timestamp`
/// is the instant the reading was taken, always UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
    /// Accuracy radius of the reading in meters
    pub accuracy: Option<f64>,
    /// Altitude in meters above sea level
    pub altitude: Option<f64>,
    /// Ground speed in meters per second
    pub speed: Option<f64>,
    /// Bearing (direction of travel) in degrees (0-360)
    pub bearing: Option<f64>,
    /// When this reading was recorded
    pub timestamp: DateTime<Utc>,
    /// Location source that produced the reading (GPS, network, ...)
    pub provider: String,
}

impl LocationSample {
    /// Creates a sample with the required fields; quality fields start empty
    pub fn new(
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            altitude: None,
            speed: None,
            bearing: None,
            timestamp,
            provider: provider.into(),
        }
    }

    /// Sets the accuracy radius
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Sets the altitude
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Sets the ground speed
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sets the bearing
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    /// Timestamp at wire precision (whole unix seconds)
    pub fn wire_timestamp(&self) -> i64 {
        self.timestamp.timestamp()
    }

    /// Validates all range and required-field constraints
    ///
    /// # Errors
    ///
    /// Returns the [`DomainError`] variant for the first field that
    /// violates its constraint. NaN values fail the range checks.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DomainError::InvalidLatitude(self.latitude));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::InvalidLongitude(self.longitude));
        }

        if let Some(accuracy) = self.accuracy {
            if !(accuracy >= 0.0) {
                return Err(DomainError::InvalidAccuracy(accuracy));
            }
        }

        if let Some(altitude) = self.altitude {
            if !(altitude >= MIN_PLAUSIBLE_ALTITUDE) {
                return Err(DomainError::InvalidAltitude(altitude));
            }
        }

        if let Some(speed) = self.speed {
            if !(speed >= 0.0) {
                return Err(DomainError::InvalidSpeed(speed));
            }
        }

        if let Some(bearing) = self.bearing {
            if !(0.0..=360.0).contains(&bearing) {
                return Err(DomainError::InvalidBearing(bearing));
            }
        }

        if self.provider.trim().is_empty() {
            return Err(DomainError::MissingProvider);
        }

        Ok(())
    }
}
