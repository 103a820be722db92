//! GeoSpider Store - Offline sample persistence
//!
//! Adapters implementing the `IOfflineStore` port from `geospider-core`:
//!
//! - [`SqliteOfflineStore`] - SQLite-backed store for production use
//! - [`MemoryOfflineStore`] - In-memory store for tests and demo runs
//!
//! ## Architecture
//!
//! These are driven (secondary) adapters in the hexagonal architecture.
//! Both serialize concurrent use internally, so the collection loop and
//! the sync engine can share one store instance.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use geospider_store::{DatabasePool, SqliteOfflineStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/var/lib/geospider/locations.db")).await?;
//! let store = SqliteOfflineStore::new(pool.pool().clone());
//! // Use store as IOfflineStore...
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod pool;
pub mod repository;

pub use memory::MemoryOfflineStore;
pub use pool::DatabasePool;
pub use repository::SqliteOfflineStore;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be converted back to a domain sample
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
