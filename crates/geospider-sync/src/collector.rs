//! Location collector - cancellable periodic collection loop
//!
//! The [`LocationCollector`] owns one background task that samples the
//! location gateway once per configured interval, appends valid
//! readings to the offline store, and evicts samples older than the
//! retention window. The loop's availability outranks any single
//! cycle's success: every step has its own error boundary, and only an
//! explicit [`stop()`](LocationCollector::stop) terminates the loop.
//!
//! ## Lifecycle
//!
//! ```text
//! Stopped ──start()──► Running ──stop()──► Stopped
//! ```
//!
//! `start()` on a running collector and `stop()` on a stopped one are
//! no-ops. Stopping signals a `CancellationToken` and waits up to a
//! bounded grace period for the in-flight iteration; if the loop does
//! not acknowledge in time it is abandoned and the collector reports
//! stopped anyway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use geospider_core::config::AppConfig;
use geospider_core::ports::IOfflineStore;

use crate::gateway::LocationGateway;

/// How long `stop()` waits for the in-flight iteration before abandoning it
const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Errors raised by collector lifecycle operations
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The platform reports the location source disabled
    #[error("Location services are not enabled")]
    ServiceUnavailable,
}

/// Handle to the running loop task, present only while Running
struct LoopHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Periodic background location collector
///
/// One background task per running instance; collection cycles within
/// it are strictly sequential. The offline store is the only resource
/// shared with the sync engine and must serialize access internally.
pub struct LocationCollector {
    gateway: Arc<LocationGateway>,
    store: Arc<dyn IOfflineStore>,
    interval: Duration,
    retention: chrono::Duration,
    /// Externally observable running flag
    running: Arc<AtomicBool>,
    /// Loop task handle, guarded so start/stop serialize
    handle: tokio::sync::Mutex<Option<LoopHandle>>,
}

impl LocationCollector {
    /// Creates a collector from its collaborators and configuration
    pub fn new(
        gateway: Arc<LocationGateway>,
        store: Arc<dyn IOfflineStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            interval: config.collection_interval(),
            retention: config.retention_window(),
            running: Arc::new(AtomicBool::new(false)),
            handle: tokio::sync::Mutex::new(None),
        }
    }

    /// Starts the background collection loop
    ///
    /// No-op if already running.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::ServiceUnavailable`] when the gateway
    /// reports the location source disabled.
    pub async fn start(&self) -> Result<(), CollectorError> {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            debug!("Collector already running, start is a no-op");
            return Ok(());
        }

        if !self.gateway.is_enabled() {
            return Err(CollectorError::ServiceUnavailable);
        }

        let token = CancellationToken::new();
        let task = tokio::spawn(Self::run_loop(
            Arc::clone(&self.gateway),
            Arc::clone(&self.store),
            self.interval,
            self.retention,
            token.clone(),
        ));

        *handle = Some(LoopHandle { token, task });
        self.running.store(true, Ordering::Release);

        info!(
            interval_secs = self.interval.as_secs(),
            retention_days = self.retention.num_days(),
            "Location collector started"
        );

        Ok(())
    }

    /// Stops the background collection loop
    ///
    /// No-op if already stopped. Waits up to the grace period for the
    /// in-flight iteration; a timeout is reported, not treated as an
    /// error, and the collector transitions to Stopped regardless.
    pub async fn stop(&self) {
        let handle = self.handle.lock().await.take();
        let Some(LoopHandle { token, task }) = handle else {
            debug!("Collector already stopped, stop is a no-op");
            return;
        };

        token.cancel();

        match tokio::time::timeout(STOP_GRACE_PERIOD, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Collection task ended abnormally"),
            Err(_) => warn!(
                grace_secs = STOP_GRACE_PERIOD.as_secs(),
                "Collection loop did not acknowledge cancellation within the grace period, abandoning"
            ),
        }

        self.running.store(false, Ordering::Release);
        info!("Location collector stopped");
    }

    /// Whether the collection loop is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Pass-through count of stored samples
    pub async fn stored_count(&self) -> anyhow::Result<u64> {
        self.store.count().await
    }

    /// The loop body: collect, clean, sleep until tick or cancellation
    ///
    /// Every step is individually fenced; no failure propagates out of
    /// an iteration. Cancellation is observed at the top of each
    /// iteration and during the sleep.
    async fn run_loop(
        gateway: Arc<LocationGateway>,
        store: Arc<dyn IOfflineStore>,
        interval: Duration,
        retention: chrono::Duration,
        token: CancellationToken,
    ) {
        info!("Collection loop started");

        loop {
            if token.is_cancelled() {
                break;
            }

            Self::collect_and_store(&gateway, &store).await;
            Self::clean_old_samples(&store, retention).await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = token.cancelled() => break,
            }
        }

        info!("Collection loop stopped");
    }

    /// One collection step: fetch a validated sample and append it
    async fn collect_and_store(gateway: &LocationGateway, store: &Arc<dyn IOfflineStore>) {
        let sample = match gateway.current_sample().await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "Location collection failed");
                return;
            }
        };

        if let Err(e) = store.append(&sample).await {
            warn!(error = %format!("{e:#}"), "Failed to store location sample");
        }
    }

    /// Retention cleanup: evict samples older than the retention window
    async fn clean_old_samples(store: &Arc<dyn IOfflineStore>, retention: chrono::Duration) {
        let cutoff = Utc::now() - retention;
        match store.delete_older_than(cutoff).await {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "Evicted samples past the retention window"),
            Err(e) => warn!(error = %format!("{e:#}"), "Retention cleanup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    use chrono::Duration as ChronoDuration;

    use geospider_core::domain::LocationSample;
    use geospider_core::ports::ILocationProvider;
    use geospider_store::MemoryOfflineStore;

    /// Provider that yields a slightly different valid fix each call
    struct CountingProvider {
        calls: AtomicU32,
        enabled: bool,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                enabled: true,
            }
        }

        fn disabled() -> Self {
            Self {
                calls: AtomicU32::new(0),
                enabled: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl ILocationProvider for CountingProvider {
        async fn get_current_location(&self) -> anyhow::Result<Option<LocationSample>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
            Ok(Some(
                LocationSample::new(40.7128 + n * 0.001, -74.0060 + n * 0.001, Utc::now(), "GPS")
                    .with_accuracy(5.0),
            ))
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn request_permissions(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    /// Provider that fails every call
    struct FailingProvider;

    #[async_trait::async_trait]
    impl ILocationProvider for FailingProvider {
        async fn get_current_location(&self) -> anyhow::Result<Option<LocationSample>> {
            anyhow::bail!("no satellites")
        }

        fn is_enabled(&self) -> bool {
            true
        }

        async fn request_permissions(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    fn config_with_interval(secs: u64) -> AppConfig {
        AppConfig {
            server_url: "https://api.example.com".to_string(),
            collection_interval_seconds: secs,
            ..AppConfig::default()
        }
    }

    fn collector_with(
        provider: Arc<dyn ILocationProvider>,
        store: Arc<MemoryOfflineStore>,
        config: &AppConfig,
    ) -> LocationCollector {
        let gateway = Arc::new(LocationGateway::new(provider));
        LocationCollector::new(gateway, store, config)
    }

    #[tokio::test]
    async fn test_start_fails_when_source_disabled() {
        let store = Arc::new(MemoryOfflineStore::new());
        let collector = collector_with(
            Arc::new(CountingProvider::disabled()),
            store,
            &config_with_interval(1),
        );

        let err = collector.start().await.unwrap_err();
        assert!(matches!(err, CollectorError::ServiceUnavailable));
        assert!(!collector.is_running());
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let store = Arc::new(MemoryOfflineStore::new());
        let collector = collector_with(
            Arc::new(CountingProvider::new()),
            store,
            &config_with_interval(1),
        );

        collector.start().await.unwrap();
        assert!(collector.is_running());

        // Second start is a no-op, not an error
        collector.start().await.unwrap();
        assert!(collector.is_running());

        collector.stop().await;
        assert!(!collector.is_running());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let store = Arc::new(MemoryOfflineStore::new());
        let collector = collector_with(
            Arc::new(CountingProvider::new()),
            store,
            &config_with_interval(1),
        );

        // Stopping a never-started collector is a no-op
        collector.stop().await;
        assert!(!collector.is_running());

        collector.start().await.unwrap();
        collector.stop().await;
        collector.stop().await;
        assert!(!collector.is_running());
    }

    #[tokio::test]
    async fn test_running_collector_appends_samples() {
        let store = Arc::new(MemoryOfflineStore::new());
        let collector = collector_with(
            Arc::new(CountingProvider::new()),
            Arc::clone(&store),
            &config_with_interval(1),
        );

        collector.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(collector.stored_count().await.unwrap() >= 1);

        collector.stop().await;
    }

    #[tokio::test]
    async fn test_failing_gateway_keeps_loop_running() {
        let store = Arc::new(MemoryOfflineStore::new());
        let collector = collector_with(
            Arc::new(FailingProvider),
            Arc::clone(&store),
            &config_with_interval(1),
        );

        collector.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Every collection attempt failed, but the loop is still alive
        assert!(collector.is_running());
        assert_eq!(store.count().await.unwrap(), 0);

        collector.stop().await;
        assert!(!collector.is_running());
    }

    #[tokio::test]
    async fn test_stop_halts_collection() {
        let store = Arc::new(MemoryOfflineStore::new());
        let collector = collector_with(
            Arc::new(CountingProvider::new()),
            Arc::clone(&store),
            &config_with_interval(1),
        );

        collector.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        collector.stop().await;

        let count_at_stop = store.count().await.unwrap();
        assert!(count_at_stop >= 1);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(store.count().await.unwrap(), count_at_stop);
    }

    #[tokio::test]
    async fn test_retention_cleanup_evicts_old_samples() {
        let store = Arc::new(MemoryOfflineStore::new());

        // Seed a sample well past the retention window
        let stale = LocationSample::new(
            10.0,
            20.0,
            Utc::now() - ChronoDuration::days(30),
            "GPS",
        );
        store.append(&stale).await.unwrap();

        let collector = collector_with(
            Arc::new(CountingProvider::new()),
            Arc::clone(&store),
            &config_with_interval(1),
        );

        collector.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        collector.stop().await;

        // The stale sample is gone; fresh ones from the loop remain
        let remaining = store.list_unsynced().await.unwrap();
        assert!(!remaining.is_empty());
        assert!(remaining
            .iter()
            .all(|row| row.sample.timestamp > Utc::now() - ChronoDuration::days(7)));
    }
}
