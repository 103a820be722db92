//! Connectivity probe implementations
//!
//! The port contract keeps `is_online` synchronous and side-effect
//! free, so the TCP probe uses the blocking `std::net` connect with a
//! short timeout rather than the async HTTP stack.

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use geospider_core::ports::INetworkMonitor;

/// Connect timeout for one probe attempt
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Connectivity probe that attempts a TCP connection to the sync
/// endpoint's host
pub struct TcpConnectivityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    /// Creates a probe against an explicit host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    /// Creates a probe against the host of an absolute URL
    ///
    /// The port falls back to the scheme default (443 for https).
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid endpoint URL: {url}"))?;
        let host = parsed
            .host_str()
            .with_context(|| format!("Endpoint URL has no host: {url}"))?
            .to_string();
        let port = parsed
            .port_or_known_default()
            .with_context(|| format!("Endpoint URL has no port: {url}"))?;

        Ok(Self::new(host, port))
    }
}

impl INetworkMonitor for TcpConnectivityProbe {
    fn is_online(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(host = %self.host, error = %e, "DNS resolution failed, treating as offline");
                return false;
            }
        };

        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }

        false
    }
}

/// Settable connectivity flag
///
/// Used by tests and demo runs to flip connectivity on and off without
/// touching the network.
pub struct StaticNetworkMonitor {
    online: AtomicBool,
}

impl StaticNetworkMonitor {
    /// Creates a monitor with the given initial state
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    /// Flips the reported connectivity state
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl INetworkMonitor for StaticNetworkMonitor {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_from_url_extracts_host_and_port() {
        let probe = TcpConnectivityProbe::from_url("https://api.example.com:8443/locations")
            .unwrap();
        assert_eq!(probe.host, "api.example.com");
        assert_eq!(probe.port, 8443);
    }

    #[test]
    fn test_from_url_uses_scheme_default_port() {
        let probe = TcpConnectivityProbe::from_url("https://api.example.com/locations").unwrap();
        assert_eq!(probe.port, 443);

        let probe = TcpConnectivityProbe::from_url("http://api.example.com/locations").unwrap();
        assert_eq!(probe.port, 80);
    }

    #[test]
    fn test_from_url_rejects_relative() {
        assert!(TcpConnectivityProbe::from_url("api.example.com/locations").is_err());
    }

    #[test]
    fn test_probe_detects_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpConnectivityProbe::new("127.0.0.1", port);
        assert!(probe.is_online());
    }

    #[test]
    fn test_probe_reports_offline_for_closed_port() {
        // Bind then drop to get a port that is very likely closed
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let probe = TcpConnectivityProbe::new("127.0.0.1", port);
        assert!(!probe.is_online());
    }

    #[test]
    fn test_static_monitor_toggles() {
        let monitor = StaticNetworkMonitor::new(true);
        assert!(monitor.is_online());

        monitor.set_online(false);
        assert!(!monitor.is_online());
    }
}
