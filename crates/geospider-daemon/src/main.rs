//! GeoSpider Daemon - Background location collection service
//!
//! This binary runs the collection/sync pipeline end to end:
//! - Periodic location collection into the offline store
//! - Periodic batched sync to the configured endpoint
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The daemon loads and validates configuration (the only failure class
//! allowed to abort startup), wires the adapters into the collector and
//! sync engine, then enters a main loop that periodically runs
//! `sync_once`. The loop is controlled by a `CancellationToken` that is
//! triggered on receipt of SIGTERM or SIGINT; shutdown stops the
//! collector within its bounded grace period and makes one final sync
//! attempt before exiting.

mod provider;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use geospider_core::config::AppConfig;
use geospider_core::ports::{ILocationProvider, INetworkMonitor, IOfflineStore, ISyncTransport};
use geospider_store::{DatabasePool, MemoryOfflineStore, SqliteOfflineStore};
use geospider_sync::{LocationCollector, LocationGateway, SyncEngine};
use geospider_transport::{HttpSyncTransport, TcpConnectivityProbe};

use provider::SimulatedLocationProvider;

/// GeoSpider background collection daemon
#[derive(Debug, Parser)]
#[command(name = "geospiderd", about = "GeoSpider location collection daemon")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep samples in memory instead of SQLite (demo mode)
    #[arg(long)]
    in_memory: bool,

    /// Seconds between sync attempts
    #[arg(long, default_value_t = 300)]
    sync_interval: u64,
}

/// Main daemon service that owns the collector and the sync loop
struct DaemonService {
    /// Sample store shared by the collector and the sync engine
    store: Arc<dyn IOfflineStore>,
    /// Background collection loop
    collector: LocationCollector,
    /// Batched sync engine
    engine: SyncEngine,
    /// Validating gateway, kept for the permission handshake
    gateway: Arc<LocationGateway>,
    /// Seconds between sync attempts
    sync_interval: Duration,
    /// Token for signalling graceful shutdown
    shutdown: CancellationToken,
}

impl DaemonService {
    /// Creates a new DaemonService
    ///
    /// Loads and validates configuration, opens the store, and wires
    /// the adapters. Configuration failures abort startup here, before
    /// any background activity begins.
    async fn new(args: &Args, shutdown: CancellationToken) -> Result<Self> {
        let config_path = args
            .config
            .clone()
            .unwrap_or_else(AppConfig::default_path);
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
        info!(config_path = %config_path.display(), server_url = %config.server_url, "Loaded configuration");

        let store: Arc<dyn IOfflineStore> = if args.in_memory {
            info!("Using in-memory sample store");
            Arc::new(MemoryOfflineStore::new())
        } else {
            let db_path = args.db.clone().unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("geospider")
                    .join("locations.db")
            });
            let pool = DatabasePool::new(&db_path)
                .await
                .context("Failed to open sample database")?;
            Arc::new(SqliteOfflineStore::new(pool.pool().clone()))
        };

        let provider: Arc<dyn ILocationProvider> = Arc::new(SimulatedLocationProvider::new());
        let gateway = Arc::new(LocationGateway::new(provider));

        let monitor: Arc<dyn INetworkMonitor> = Arc::new(
            TcpConnectivityProbe::from_url(&config.server_url)
                .context("Failed to build connectivity probe")?,
        );
        let transport: Arc<dyn ISyncTransport> =
            Arc::new(HttpSyncTransport::new().context("Failed to build sync transport")?);

        let collector =
            LocationCollector::new(Arc::clone(&gateway), Arc::clone(&store), &config);
        let engine = SyncEngine::new(monitor, Arc::clone(&store), transport, &config);

        Ok(Self {
            store,
            collector,
            engine,
            gateway,
            sync_interval: Duration::from_secs(args.sync_interval),
            shutdown,
        })
    }

    /// Runs the daemon's main loop
    ///
    /// 1. Negotiates location permission
    /// 2. Starts the collection loop
    /// 3. Enters the periodic sync loop with graceful shutdown support
    async fn run(&self) -> Result<()> {
        if !self
            .gateway
            .request_permissions()
            .await
            .context("Failed to negotiate location permission")?
        {
            anyhow::bail!("Location permission denied");
        }

        self.collector
            .start()
            .await
            .context("Failed to start location collector")?;

        let result = self.sync_loop().await;

        // Stop collection within its bounded grace period, then make one
        // last attempt to drain the buffer.
        self.collector.stop().await;

        let outcome = self.engine.sync_once().await;
        info!(
            success = outcome.success,
            synced = outcome.synced_count,
            "Final sync attempt finished"
        );

        match self.store.count().await {
            Ok(stored) => info!(stored, "Samples remaining in offline store"),
            Err(e) => warn!(error = %format!("{e:#}"), "Failed to query stored sample count"),
        }

        result
    }

    /// Periodic sync loop, terminated by the shutdown token
    async fn sync_loop(&self) -> Result<()> {
        info!(
            sync_interval_secs = self.sync_interval.as_secs(),
            "Starting sync loop"
        );

        let mut interval = tokio::time::interval(self.sync_interval);
        // The first tick fires immediately; consume it so the first sync
        // happens one interval after startup, once samples exist.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
            }

            let outcome = self.engine.sync_once().await;
            if outcome.success {
                info!(
                    synced = outcome.synced_count,
                    running = self.collector.is_running(),
                    "Sync cycle completed"
                );
            } else {
                warn!(
                    synced = outcome.synced_count,
                    error = outcome.error_message.as_deref().unwrap_or("unknown"),
                    "Sync cycle failed"
                );
            }
        }

        info!("Sync loop terminated");
        Ok(())
    }
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    info!("GeoSpider daemon starting (geospiderd)");

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let service = DaemonService::new(&args, shutdown_token.clone()).await?;

    let result = service.run().await;

    match &result {
        Ok(()) => info!("GeoSpider daemon shut down gracefully"),
        Err(e) => error!(error = %e, "GeoSpider daemon exiting with error"),
    }

    result
}
