//! Location gateway - validating wrapper over the provider port
//!
//! The [`LocationGateway`] sits between the platform location provider
//! and the collection loop. A provider that reports "no reading
//! available" and one that fails outright look identical past this
//! boundary: both become [`GatewayError::Unavailable`]. Readings that
//! do arrive are validated before they are handed on, so an invalid
//! sample never reaches the store.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use geospider_core::domain::{DomainError, LocationSample};
use geospider_core::ports::ILocationProvider;

/// Errors surfaced by the location gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The source produced no reading or failed while producing one
    #[error("Unable to retrieve current location: {0}")]
    Unavailable(String),

    /// The source produced a reading that violates a range constraint
    #[error("Location source produced an invalid sample: {0}")]
    InvalidSample(#[from] DomainError),
}

/// Validating gateway over a platform location provider
pub struct LocationGateway {
    provider: Arc<dyn ILocationProvider>,
}

impl LocationGateway {
    /// Creates a gateway over the given provider
    pub fn new(provider: Arc<dyn ILocationProvider>) -> Self {
        Self { provider }
    }

    /// Obtains and validates one reading
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] when the provider fails or
    /// has no fix, and [`GatewayError::InvalidSample`] when the reading
    /// violates a range constraint.
    pub async fn current_sample(&self) -> Result<LocationSample, GatewayError> {
        let reading = self
            .provider
            .get_current_location()
            .await
            .map_err(|e| GatewayError::Unavailable(format!("{e:#}")))?;

        let sample = reading
            .ok_or_else(|| GatewayError::Unavailable("no reading available".to_string()))?;

        sample.validate()?;

        debug!(
            latitude = sample.latitude,
            longitude = sample.longitude,
            provider = %sample.provider,
            "Obtained location sample"
        );

        Ok(sample)
    }

    /// Whether the location source is enabled
    pub fn is_enabled(&self) -> bool {
        self.provider.is_enabled()
    }

    /// Negotiates location permission with the platform
    pub async fn request_permissions(&self) -> anyhow::Result<bool> {
        self.provider.request_permissions().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Provider stub whose behavior is fixed at construction
    struct StubProvider {
        reading: Option<LocationSample>,
        fail: bool,
        enabled: bool,
    }

    #[async_trait::async_trait]
    impl ILocationProvider for StubProvider {
        async fn get_current_location(&self) -> anyhow::Result<Option<LocationSample>> {
            if self.fail {
                anyhow::bail!("GPS receiver offline");
            }
            Ok(self.reading.clone())
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn request_permissions(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    fn gateway(provider: StubProvider) -> LocationGateway {
        LocationGateway::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_valid_reading_passes_through() {
        let sample = LocationSample::new(40.0, -74.0, Utc::now(), "GPS");
        let gw = gateway(StubProvider {
            reading: Some(sample.clone()),
            fail: false,
            enabled: true,
        });

        let got = gw.current_sample().await.unwrap();
        assert_eq!(got, sample);
    }

    #[tokio::test]
    async fn test_absent_reading_becomes_unavailable() {
        let gw = gateway(StubProvider {
            reading: None,
            fail: false,
            enabled: true,
        });

        let err = gw.current_sample().await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_unavailable() {
        let gw = gateway(StubProvider {
            reading: None,
            fail: true,
            enabled: true,
        });

        let err = gw.current_sample().await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert!(err.to_string().contains("GPS receiver offline"));
    }

    #[tokio::test]
    async fn test_invalid_reading_rejected() {
        let bad = LocationSample::new(91.0, 0.0, Utc::now(), "GPS");
        let gw = gateway(StubProvider {
            reading: Some(bad),
            fail: false,
            enabled: true,
        });

        let err = gw.current_sample().await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::InvalidSample(DomainError::InvalidLatitude(_))
        ));
    }

    #[tokio::test]
    async fn test_is_enabled_passthrough() {
        let gw = gateway(StubProvider {
            reading: None,
            fail: false,
            enabled: false,
        });
        assert!(!gw.is_enabled());
    }
}
