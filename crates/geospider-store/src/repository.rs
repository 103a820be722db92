//! SQLite implementation of IOfflineStore
//!
//! This module provides the concrete SQLite-based implementation of the
//! offline store port defined in geospider-core.
//!
//! ## Type Mapping
//!
//! | Domain Type      | SQL Type | Strategy                               |
//! |------------------|----------|----------------------------------------|
//! | f64 coordinates  | REAL     | direct                                 |
//! | Option<f64>      | REAL     | NULL when absent                       |
//! | DateTime<Utc>    | INTEGER  | unix whole seconds (wire precision)    |
//! | provider         | TEXT     | direct                                 |
//! | synced flag      | INTEGER  | 0 / 1                                  |

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, SqlitePool};

use geospider_core::domain::{GeoJsonFeatureCollection, LocationSample};
use geospider_core::ports::{IOfflineStore, StoredSample};

use crate::StoreError;

/// SQLite-based implementation of the offline store port
///
/// All operations go through a connection pool; SQLite's WAL mode plus
/// the pool's busy timeout give the serialization guarantees the port
/// contract requires.
pub struct SqliteOfflineStore {
    pool: SqlitePool,
}

impl SqliteOfflineStore {
    /// Creates a new store instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetches rows ordered by timestamp, optionally unsynced-only
    async fn fetch_rows(&self, unsynced_only: bool) -> Result<Vec<StoredSample>, StoreError> {
        let sql = if unsynced_only {
            "SELECT id, latitude, longitude, accuracy, altitude, speed, bearing, \
             timestamp, provider, synced \
             FROM locations WHERE synced = 0 ORDER BY timestamp ASC, id ASC"
        } else {
            "SELECT id, latitude, longitude, accuracy, altitude, speed, bearing, \
             timestamp, provider, synced \
             FROM locations ORDER BY timestamp ASC, id ASC"
        };

        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from)?;

        rows.iter().map(row_to_stored).collect()
    }
}

/// Maps one SQLite row to a StoredSample
fn row_to_stored(row: &SqliteRow) -> Result<StoredSample, StoreError> {
    let secs: i64 = row.try_get("timestamp").map_err(StoreError::from)?;
    let timestamp = DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
        StoreError::SerializationError(format!("Invalid stored timestamp: {}", secs))
    })?;

    let sample = LocationSample {
        latitude: row.try_get("latitude").map_err(StoreError::from)?,
        longitude: row.try_get("longitude").map_err(StoreError::from)?,
        accuracy: row.try_get("accuracy").map_err(StoreError::from)?,
        altitude: row.try_get("altitude").map_err(StoreError::from)?,
        speed: row.try_get("speed").map_err(StoreError::from)?,
        bearing: row.try_get("bearing").map_err(StoreError::from)?,
        timestamp,
        provider: row.try_get("provider").map_err(StoreError::from)?,
    };

    let synced: i64 = row.try_get("synced").map_err(StoreError::from)?;

    Ok(StoredSample {
        id: row.try_get("id").map_err(StoreError::from)?,
        sample,
        synced: synced != 0,
    })
}

#[async_trait::async_trait]
impl IOfflineStore for SqliteOfflineStore {
    async fn append(&self, sample: &LocationSample) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO locations \
             (latitude, longitude, accuracy, altitude, speed, bearing, timestamp, provider, synced) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(sample.latitude)
        .bind(sample.longitude)
        .bind(sample.accuracy)
        .bind(sample.altitude)
        .bind(sample.speed)
        .bind(sample.bearing)
        .bind(sample.wire_timestamp())
        .bind(&sample.provider)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(result.last_insert_rowid())
    }

    async fn list_unsynced(&self) -> anyhow::Result<Vec<StoredSample>> {
        Ok(self.fetch_rows(true).await?)
    }

    async fn mark_synced(&self, ids: &[i64]) -> anyhow::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::new("UPDATE locations SET synced = 1 WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        builder.push(")");

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM locations WHERE timestamp < ?")
            .bind(cutoff.timestamp())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::debug!(removed, cutoff = %cutoff, "Evicted aged samples");
        }

        Ok(removed)
    }

    async fn delete_synced(&self) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM locations WHERE synced = 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(count as u64)
    }

    async fn unsynced_count(&self) -> anyhow::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations WHERE synced = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(count as u64)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM locations")
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(())
    }

    async fn export_geojson(
        &self,
        unsynced_only: bool,
    ) -> anyhow::Result<GeoJsonFeatureCollection> {
        let rows = self.fetch_rows(unsynced_only).await?;
        let collection =
            GeoJsonFeatureCollection::from_samples(rows.iter().map(|row| &row.sample))?;
        Ok(collection)
    }
}
