//! Location provider port (driven/secondary port)
//!
//! This module defines the interface for platform location sources
//! (GPS, network positioning, or a simulated source). The collection
//! layer never talks to platform APIs directly; it consumes this trait.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because failures at this boundary are
//!   platform-specific (permission revoked, radio off, driver error)
//!   and don't need domain-level classification.
//! - A provider that cannot currently produce a fix returns `Ok(None)`;
//!   the gateway layer converts absence into an explicit error so it
//!   never silently crosses into the scheduler.

use crate::domain::LocationSample;

/// Port trait for platform location sources
#[async_trait::async_trait]
pub trait ILocationProvider: Send + Sync {
    /// Obtains the current reading from the source
    ///
    /// Suspends until a reading is available or the source fails.
    /// Returns `Ok(None)` when the source is working but has no fix.
    async fn get_current_location(&self) -> anyhow::Result<Option<LocationSample>>;

    /// Whether the location source is enabled on this platform
    ///
    /// Synchronous capability probe with no side effects.
    fn is_enabled(&self) -> bool;

    /// Negotiates location permission with the user/platform
    ///
    /// Returns `Ok(false)` for a plain denial; only infrastructure
    /// failures are errors.
    async fn request_permissions(&self) -> anyhow::Result<bool>;
}
