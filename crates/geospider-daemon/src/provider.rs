//! Simulated location provider
//!
//! There is no portable location source on a desktop host, so the
//! daemon ships with a deterministic simulated provider: each reading
//! steps a fixed origin slightly north-east, with slowly varying
//! quality metadata. Useful for demo runs and end-to-end testing of the
//! collection/sync pipeline.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::Utc;

use geospider_core::domain::LocationSample;
use geospider_core::ports::ILocationProvider;

/// Simulated fix acquisition delay
const FIX_DELAY: Duration = Duration::from_millis(100);

/// Deterministic walking location source
pub struct SimulatedLocationProvider {
    calls: AtomicU32,
}

impl SimulatedLocationProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }
}

impl Default for SimulatedLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ILocationProvider for SimulatedLocationProvider {
    async fn get_current_location(&self) -> anyhow::Result<Option<LocationSample>> {
        tokio::time::sleep(FIX_DELAY).await;

        let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
        let sample = LocationSample::new(
            40.7128 + n * 0.001,
            -74.0060 + n * 0.001,
            Utc::now(),
            "SimulatedGPS",
        )
        .with_accuracy(5.0 + (n % 3.0))
        .with_altitude(10.0 + n)
        .with_speed(1.5 + (n % 2.0))
        .with_bearing((n * 15.0) % 360.0);

        Ok(Some(sample))
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn request_permissions(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}
