//! HTTP implementation of ISyncTransport
//!
//! Posts one JSON batch per call. Any 2xx status counts as delivered;
//! every other status is "not delivered" (the engine decides what to do
//! with that). Network-level failures surface as errors, which the
//! engine treats identically to a rejection.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use geospider_core::domain::BatchPayload;
use geospider_core::ports::ISyncTransport;

/// Per-request timeout. The sync engine does not time requests out
/// itself; bounding them is this adapter's job.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP batch transport backed by reqwest
pub struct HttpSyncTransport {
    /// The underlying HTTP client
    client: Client,
}

impl HttpSyncTransport {
    /// Creates a transport with a default client (30 s request timeout)
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Creates a transport over a caller-configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ISyncTransport for HttpSyncTransport {
    async fn send_batch(&self, url: &str, payload: &BatchPayload) -> Result<bool> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .context("Failed to POST batch to sync endpoint")?;

        let status = response.status();
        if status.is_success() {
            debug!(batch_len = payload.len(), %status, "Batch delivered");
            Ok(true)
        } else {
            warn!(batch_len = payload.len(), %status, "Sync endpoint rejected batch");
            Ok(false)
        }
    }
}
