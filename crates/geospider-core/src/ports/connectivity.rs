//! Connectivity port (driven/secondary port)
//!
//! Abstract "am I online" probe. Kept synchronous and side-effect free
//! so the sync engine can consult it cheaply at the top of every
//! attempt; anything slow (DNS, captive portal detection) belongs in
//! the adapter behind a cached flag.

/// Port trait for network connectivity probes
pub trait INetworkMonitor: Send + Sync {
    /// Whether the device currently has network connectivity
    fn is_online(&self) -> bool;
}
