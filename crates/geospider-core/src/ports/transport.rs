//! Sync transport port (driven/secondary port)
//!
//! Abstract "send this batch" operation. The HTTP client, headers, and
//! retry posture live in the adapter; the engine only needs a
//! delivered/not-delivered answer.

use crate::domain::BatchPayload;

/// Port trait for delivering one batch to the remote endpoint
#[async_trait::async_trait]
pub trait ISyncTransport: Send + Sync {
    /// Posts one batch payload to `url`
    ///
    /// `Ok(false)` and `Err(_)` both mean "batch not delivered"; the
    /// engine treats them identically. `Ok(true)` means the endpoint
    /// acknowledged the batch.
    async fn send_batch(&self, url: &str, payload: &BatchPayload) -> anyhow::Result<bool>;
}
