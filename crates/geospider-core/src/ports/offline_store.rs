//! Offline store port (driven/secondary port)
//!
//! This module defines the interface for persisting collected samples
//! while offline and querying/marking them during sync. The storage
//! engine itself (SQLite, in-memory, ...) lives in an adapter crate.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   and don't need domain-level classification.
//! - Rows are keyed by an `i64` id assigned at append time; sync marks
//!   batches of ids in one call to keep store round-trips at one per
//!   delivered batch.
//! - Implementations must serialize concurrent use internally: the
//!   collection loop appends and evicts while the sync engine reads and
//!   marks, and a sync read must never observe a half-written sample.
//!   Retention cleanup and sync-driven deletes composed together must
//!   never double-delete or resurrect a row.

use chrono::{DateTime, Utc};

use crate::domain::{GeoJsonFeatureCollection, LocationSample};

/// One stored sample row: the sample plus its storage identity
///
/// This is a port-level DTO, not a domain entity; the sync engine uses
/// the id to mark delivered rows without re-reading them.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSample {
    /// Row id assigned by the store at append time
    pub id: i64,
    /// The collected sample
    pub sample: LocationSample,
    /// Whether this row has been confirmed delivered
    pub synced: bool,
}

/// Port trait for offline sample persistence
#[async_trait::async_trait]
pub trait IOfflineStore: Send + Sync {
    /// Appends a sample, returning the assigned row id
    ///
    /// Samples are validated before they reach the store; the store
    /// persists what it is given.
    async fn append(&self, sample: &LocationSample) -> anyhow::Result<i64>;

    /// Returns all unsynced rows ordered by ascending timestamp
    async fn list_unsynced(&self) -> anyhow::Result<Vec<StoredSample>>;

    /// Marks the given rows as synced (one call per delivered batch)
    async fn mark_synced(&self, ids: &[i64]) -> anyhow::Result<()>;

    /// Deletes rows with a timestamp strictly older than `cutoff`,
    /// regardless of sync state; returns the number removed
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64>;

    /// Deletes rows already marked synced; returns the number removed
    async fn delete_synced(&self) -> anyhow::Result<u64>;

    /// Total number of stored rows, synced or not
    async fn count(&self) -> anyhow::Result<u64>;

    /// Number of rows not yet synced
    async fn unsynced_count(&self) -> anyhow::Result<u64>;

    /// Removes every stored row
    async fn clear(&self) -> anyhow::Result<()>;

    /// Exports stored samples as a GeoJSON feature collection
    ///
    /// With `unsynced_only`, only rows not yet delivered are included.
    async fn export_geojson(&self, unsynced_only: bool)
        -> anyhow::Result<GeoJsonFeatureCollection>;
}
