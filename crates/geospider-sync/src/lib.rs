//! GeoSpider Sync - Collection scheduling and batched upload
//!
//! Provides:
//! - Periodic location collection with retention cleanup
//! - Cooperative start/stop lifecycle with a bounded stop grace period
//! - Batched, fail-fast synchronization of buffered samples
//!
//! ## Modules
//!
//! - [`gateway`] - Validating wrapper over the platform location provider
//! - [`collector`] - Cancellable periodic collection loop
//! - [`engine`] - Batched sync engine (`sync_once`)

pub mod collector;
pub mod engine;
pub mod gateway;

pub use collector::{CollectorError, LocationCollector};
pub use engine::SyncEngine;
pub use gateway::{GatewayError, LocationGateway};
