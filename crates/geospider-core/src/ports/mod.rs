//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates (or in
//! the platform layer for location and connectivity).
//!
//! ## Ports Overview
//!
//! - [`ILocationProvider`] - Platform location source (GPS, network, simulated)
//! - [`IOfflineStore`] - Append-only persistence of collected samples
//! - [`INetworkMonitor`] - Connectivity probe
//! - [`ISyncTransport`] - Batch delivery to the remote endpoint

pub mod connectivity;
pub mod location_provider;
pub mod offline_store;
pub mod transport;

pub use connectivity::INetworkMonitor;
pub use location_provider::ILocationProvider;
pub use offline_store::{IOfflineStore, StoredSample};
pub use transport::ISyncTransport;
