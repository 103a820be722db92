//! GeoSpider Transport - Batch delivery and connectivity probing
//!
//! Adapters implementing the outbound network ports from `geospider-core`:
//!
//! - [`HttpSyncTransport`] - `ISyncTransport` over reqwest: one JSON POST
//!   per batch, 2xx means delivered
//! - [`TcpConnectivityProbe`] - `INetworkMonitor` that checks whether the
//!   sync endpoint's host accepts TCP connections
//! - [`StaticNetworkMonitor`] - settable `INetworkMonitor` for tests and
//!   demo runs
//!
//! ## Architecture
//!
//! These are driven (secondary) adapters in the hexagonal architecture.
//! The sync engine only sees delivered/not-delivered; status handling,
//! timeouts, and TLS live here.

pub mod connectivity;
pub mod http;

pub use connectivity::{StaticNetworkMonitor, TcpConnectivityProbe};
pub use http::HttpSyncTransport;
