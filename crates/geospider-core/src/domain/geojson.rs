//! GeoJSON export types
//!
//! Minimal GeoJSON (RFC 7946) subset for exporting stored samples:
//! `Point` geometry, `Feature` with string properties, and
//! `FeatureCollection`. Coordinates are `[longitude, latitude]` with an
//! optional third altitude element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::sample::LocationSample;

/// GeoJSON Point geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]` or `[longitude, latitude, altitude]`
    pub coordinates: Vec<f64>,
}

impl GeoJsonPoint {
    /// Creates a point, validating the coordinate ranges
    ///
    /// # Errors
    ///
    /// Returns a range error if latitude or longitude is out of bounds.
    pub fn new(longitude: f64, latitude: f64, altitude: Option<f64>) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidLongitude(longitude));
        }

        let mut coordinates = vec![longitude, latitude];
        if let Some(altitude) = altitude {
            coordinates.push(altitude);
        }

        Ok(Self {
            kind: "Point".to_string(),
            coordinates,
        })
    }
}

/// GeoJSON Feature with a point geometry and string properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: GeoJsonPoint,
    pub properties: BTreeMap<String, String>,
}

/// GeoJSON FeatureCollection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<GeoJsonFeature>,
}

impl GeoJsonFeatureCollection {
    /// Builds a feature collection from samples, preserving their order
    pub fn from_samples<'a, I>(samples: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = &'a LocationSample>,
    {
        let features = samples
            .into_iter()
            .map(LocationSample::to_geojson_feature)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind: "FeatureCollection".to_string(),
            features,
        })
    }
}

impl LocationSample {
    /// Converts the sample to a GeoJSON feature
    ///
    /// Quality metadata and the provider land in the feature properties;
    /// the timestamp property uses wire precision (unix whole seconds).
    pub fn to_geojson_feature(&self) -> Result<GeoJsonFeature, DomainError> {
        let geometry = GeoJsonPoint::new(self.longitude, self.latitude, self.altitude)?;

        let mut properties = BTreeMap::new();
        properties.insert("timestamp".to_string(), self.wire_timestamp().to_string());
        properties.insert("provider".to_string(), self.provider.clone());
        if let Some(accuracy) = self.accuracy {
            properties.insert("accuracy".to_string(), accuracy.to_string());
        }
        if let Some(speed) = self.speed {
            properties.insert("speed".to_string(), speed.to_string());
        }
        if let Some(bearing) = self.bearing {
            properties.insert("bearing".to_string(), bearing.to_string());
        }

        Ok(GeoJsonFeature {
            kind: "Feature".to_string(),
            geometry,
            properties,
        })
    }
}
