//! GeoSpider Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `LocationSample`, `SyncOutcome`, `BatchPayload`,
//!   GeoJSON export types
//! - **Configuration** - `AppConfig` loaded and validated once at startup
//! - **Port definitions** - Traits for adapters: `ILocationProvider`,
//!   `IOfflineStore`, `INetworkMonitor`, `ISyncTransport`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! The collection scheduler and sync engine (in `geospider-sync`) orchestrate
//! domain entities through the port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
