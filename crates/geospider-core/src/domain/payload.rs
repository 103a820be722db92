//! Wire payload for one sync batch
//!
//! The JSON shape posted to the sync endpoint. Field names are fixed
//! for compatibility with the server; timestamps are unix whole
//! seconds. These are port-level DTOs, built from validated
//! [`LocationSample`]s just before transmission.

use serde::{Deserialize, Serialize};

use super::sample::LocationSample;

/// One location record as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub bearing: Option<f64>,
    /// Unix timestamp in whole seconds
    pub timestamp: i64,
    pub provider: String,
}

impl From<&LocationSample> for WireLocation {
    fn from(sample: &LocationSample) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            accuracy: sample.accuracy,
            altitude: sample.altitude,
            speed: sample.speed,
            bearing: sample.bearing,
            timestamp: sample.wire_timestamp(),
            provider: sample.provider.clone(),
        }
    }
}

/// The body of one batch POST: `{ "locations": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPayload {
    pub locations: Vec<WireLocation>,
}

impl BatchPayload {
    /// Builds a payload from samples, preserving their order
    pub fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a LocationSample>,
    {
        Self {
            locations: samples.into_iter().map(WireLocation::from).collect(),
        }
    }

    /// Number of locations in the batch
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if the batch carries no locations
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
