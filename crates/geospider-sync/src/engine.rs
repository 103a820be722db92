//! Batched synchronization engine
//!
//! The [`SyncEngine`] drains the offline store toward the remote
//! endpoint one batch at a time. Batches are built from unsynced
//! samples in ascending timestamp order, so chronological sync order is
//! deterministic for downstream consumers, and the engine stops at the
//! first batch that is not delivered: a bad network window costs at
//! most one batch, and the caller gets an actionable partial-progress
//! count.
//!
//! ## Sync Flow
//!
//! 1. **Connectivity**: offline is not a failure, just nothing to do
//! 2. **Read**: fetch unsynced samples, empty is equally a no-op
//! 3. **Partition**: ascending timestamp, chunks of at most the batch size
//! 4. **Deliver**: one POST per batch, fail fast on the first undelivered
//! 5. **Mark**: delivered batches are marked synced immediately, so a
//!    later failure never causes the acknowledged prefix to be re-sent

use std::sync::Arc;

use tracing::{debug, info, warn};

use geospider_core::config::AppConfig;
use geospider_core::domain::{BatchPayload, SyncOutcome};
use geospider_core::ports::{INetworkMonitor, IOfflineStore, ISyncTransport};

/// Batched, fail-fast sync engine
///
/// ## Dependencies
///
/// - `monitor`: connectivity probe consulted at the top of every attempt
/// - `store`: offline sample persistence shared with the collector
/// - `transport`: batch delivery to the remote endpoint
pub struct SyncEngine {
    monitor: Arc<dyn INetworkMonitor>,
    store: Arc<dyn IOfflineStore>,
    transport: Arc<dyn ISyncTransport>,
    /// Endpoint receiving batch uploads
    server_url: String,
    /// Maximum samples per batch
    batch_size: usize,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` with the given dependencies
    ///
    /// # Arguments
    /// * `monitor` - Connectivity probe (INetworkMonitor)
    /// * `store` - Offline sample store (IOfflineStore)
    /// * `transport` - Batch transport (ISyncTransport)
    /// * `config` - Application configuration for endpoint and batch size
    pub fn new(
        monitor: Arc<dyn INetworkMonitor>,
        store: Arc<dyn IOfflineStore>,
        transport: Arc<dyn ISyncTransport>,
        config: &AppConfig,
    ) -> Self {
        Self {
            monitor,
            store,
            transport,
            server_url: config.server_url.clone(),
            batch_size: config.sync_batch_size,
        }
    }

    /// Attempts to sync all buffered samples to the server
    ///
    /// Never returns an error to the caller: every failure mode is
    /// folded into the returned [`SyncOutcome`]. May run concurrently
    /// with the collection loop; the store serializes access.
    pub async fn sync_once(&self) -> SyncOutcome {
        if !self.monitor.is_online() {
            // Not being online is not an error, just nothing to sync
            debug!("Offline, skipping sync attempt");
            return SyncOutcome::success(0);
        }

        let mut pending = match self.store.list_unsynced().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to read unsynced samples");
                return SyncOutcome::failure(format!("Failed to read unsynced samples: {e:#}"));
            }
        };

        if pending.is_empty() {
            debug!("No unsynced samples");
            return SyncOutcome::success(0);
        }

        // The store returns rows ordered already; sort defensively so the
        // chronological guarantee doesn't depend on the adapter.
        pending.sort_by_key(|row| (row.sample.timestamp, row.id));

        info!(
            pending = pending.len(),
            batch_size = self.batch_size,
            "Starting sync"
        );

        let mut synced = 0usize;

        for batch in pending.chunks(self.batch_size) {
            let payload = BatchPayload::from_samples(batch.iter().map(|row| &row.sample));

            let delivered = match self.transport.send_batch(&self.server_url, &payload).await {
                Ok(delivered) => delivered,
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "Batch send errored");
                    false
                }
            };

            if !delivered {
                warn!(
                    batch_len = batch.len(),
                    synced, "Batch not delivered, stopping sync"
                );
                return SyncOutcome::failure_after(
                    synced,
                    format!("Failed to sync batch containing {} items", batch.len()),
                );
            }

            synced += batch.len();

            let ids: Vec<i64> = batch.iter().map(|row| row.id).collect();
            if let Err(e) = self.store.mark_synced(&ids).await {
                // The endpoint acknowledged the batch, so it counts as
                // synced, but an unmarked batch will be re-sent on the
                // next attempt. Surface that as a failure.
                warn!(error = %format!("{e:#}"), "Failed to mark delivered batch as synced");
                return SyncOutcome::failure_after(
                    synced,
                    format!(
                        "Delivered batch of {} items but failed to mark them synced: {e:#}",
                        batch.len()
                    ),
                );
            }

            debug!(batch_len = batch.len(), synced, "Batch synced");
        }

        info!(synced, "Sync completed");
        SyncOutcome::success(synced)
    }
}
