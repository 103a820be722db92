//! In-memory implementation of IOfflineStore
//!
//! Backed by a mutex-guarded vector, for tests and demo runs where no
//! database file is wanted. Provides the same serialization guarantees
//! as the SQLite store: every operation takes the lock, so a reader
//! never observes a half-written row.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use geospider_core::domain::{GeoJsonFeatureCollection, LocationSample};
use geospider_core::ports::{IOfflineStore, StoredSample};

#[derive(Debug, Default)]
struct MemoryInner {
    rows: Vec<StoredSample>,
    next_id: i64,
}

/// In-memory offline store
#[derive(Debug, Default)]
pub struct MemoryOfflineStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryOfflineStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock means a panic mid-operation; the row vector is
        // still structurally valid, so keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl IOfflineStore for MemoryOfflineStore {
    async fn append(&self, sample: &LocationSample) -> anyhow::Result<i64> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(StoredSample {
            id,
            sample: sample.clone(),
            synced: false,
        });
        Ok(id)
    }

    async fn list_unsynced(&self) -> anyhow::Result<Vec<StoredSample>> {
        let inner = self.lock();
        let mut rows: Vec<StoredSample> = inner
            .rows
            .iter()
            .filter(|row| !row.synced)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.sample.timestamp, row.id));
        Ok(rows)
    }

    async fn mark_synced(&self, ids: &[i64]) -> anyhow::Result<()> {
        let mut inner = self.lock();
        for row in inner.rows.iter_mut() {
            if ids.contains(&row.id) {
                row.synced = true;
            }
        }
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|row| row.sample.timestamp >= cutoff);
        Ok((before - inner.rows.len()) as u64)
    }

    async fn delete_synced(&self) -> anyhow::Result<u64> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|row| !row.synced);
        Ok((before - inner.rows.len()) as u64)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.lock().rows.len() as u64)
    }

    async fn unsynced_count(&self) -> anyhow::Result<u64> {
        Ok(self.lock().rows.iter().filter(|row| !row.synced).count() as u64)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.lock().rows.clear();
        Ok(())
    }

    async fn export_geojson(
        &self,
        unsynced_only: bool,
    ) -> anyhow::Result<GeoJsonFeatureCollection> {
        let mut rows: Vec<StoredSample> = {
            let inner = self.lock();
            inner
                .rows
                .iter()
                .filter(|row| !unsynced_only || !row.synced)
                .cloned()
                .collect()
        };
        rows.sort_by_key(|row| (row.sample.timestamp, row.id));

        let collection =
            GeoJsonFeatureCollection::from_samples(rows.iter().map(|row| &row.sample))?;
        Ok(collection)
    }
}
