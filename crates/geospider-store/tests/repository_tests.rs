//! Integration tests for the SQLite offline store
//!
//! Runs the full IOfflineStore contract against an in-memory SQLite
//! database, plus a persistence check against a real file.

use chrono::{TimeZone, Utc};

use geospider_core::domain::LocationSample;
use geospider_core::ports::IOfflineStore;
use geospider_store::{DatabasePool, SqliteOfflineStore};

async fn memory_store() -> SqliteOfflineStore {
    let pool = DatabasePool::in_memory().await.expect("in-memory pool");
    SqliteOfflineStore::new(pool.pool().clone())
}

fn sample_at(secs: i64) -> LocationSample {
    LocationSample::new(
        40.7128,
        -74.0060,
        Utc.timestamp_opt(secs, 0).unwrap(),
        "GPS",
    )
    .with_accuracy(5.0)
}

#[tokio::test]
async fn append_and_round_trip() {
    let store = memory_store().await;
    let original = sample_at(1_750_000_000)
        .with_altitude(12.5)
        .with_speed(1.5)
        .with_bearing(270.0);

    let id = store.append(&original).await.unwrap();
    assert!(id > 0);

    let rows = store.list_unsynced().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert!(!rows[0].synced);
    // Timestamps survive at wire precision (whole seconds)
    assert_eq!(rows[0].sample, original);
}

#[tokio::test]
async fn sub_second_timestamps_truncate_to_wire_precision() {
    let store = memory_store().await;
    let ts = Utc.timestamp_opt(1_750_000_000, 0).unwrap() + chrono::Duration::milliseconds(640);
    let original = LocationSample::new(10.0, 20.0, ts, "network");

    store.append(&original).await.unwrap();

    let rows = store.list_unsynced().await.unwrap();
    assert_eq!(rows[0].sample.wire_timestamp(), original.wire_timestamp());
    assert_eq!(rows[0].sample.timestamp.timestamp_subsec_millis(), 0);
}

#[tokio::test]
async fn optional_fields_round_trip_as_null() {
    let store = memory_store().await;
    let original = sample_at(100);
    assert!(original.altitude.is_none());

    store.append(&original).await.unwrap();

    let rows = store.list_unsynced().await.unwrap();
    assert_eq!(rows[0].sample.accuracy, Some(5.0));
    assert!(rows[0].sample.altitude.is_none());
    assert!(rows[0].sample.speed.is_none());
    assert!(rows[0].sample.bearing.is_none());
}

#[tokio::test]
async fn list_unsynced_orders_by_timestamp() {
    let store = memory_store().await;
    store.append(&sample_at(300)).await.unwrap();
    store.append(&sample_at(100)).await.unwrap();
    store.append(&sample_at(200)).await.unwrap();

    let rows = store.list_unsynced().await.unwrap();
    let stamps: Vec<i64> = rows.iter().map(|r| r.sample.wire_timestamp()).collect();
    assert_eq!(stamps, vec![100, 200, 300]);
}

#[tokio::test]
async fn mark_synced_batch() {
    let store = memory_store().await;
    let a = store.append(&sample_at(100)).await.unwrap();
    let b = store.append(&sample_at(200)).await.unwrap();
    store.append(&sample_at(300)).await.unwrap();

    store.mark_synced(&[a, b]).await.unwrap();

    assert_eq!(store.unsynced_count().await.unwrap(), 1);
    assert_eq!(store.count().await.unwrap(), 3);

    let rows = store.list_unsynced().await.unwrap();
    assert_eq!(rows[0].sample.wire_timestamp(), 300);
}

#[tokio::test]
async fn mark_synced_empty_batch_is_noop() {
    let store = memory_store().await;
    store.append(&sample_at(100)).await.unwrap();

    store.mark_synced(&[]).await.unwrap();

    assert_eq!(store.unsynced_count().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_older_than_ignores_sync_state() {
    let store = memory_store().await;
    let old_id = store.append(&sample_at(100)).await.unwrap();
    store.append(&sample_at(5_000)).await.unwrap();
    store.mark_synced(&[old_id]).await.unwrap();

    let removed = store
        .delete_older_than(Utc.timestamp_opt(1_000, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_synced_removes_only_synced() {
    let store = memory_store().await;
    let a = store.append(&sample_at(100)).await.unwrap();
    store.append(&sample_at(200)).await.unwrap();
    store.mark_synced(&[a]).await.unwrap();

    let removed = store.delete_synced().await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(store.count().await.unwrap(), 1);
    assert_eq!(store.unsynced_count().await.unwrap(), 1);
}

#[tokio::test]
async fn clear_removes_everything() {
    let store = memory_store().await;
    store.append(&sample_at(100)).await.unwrap();
    store.append(&sample_at(200)).await.unwrap();

    store.clear().await.unwrap();

    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.list_unsynced().await.unwrap().is_empty());
}

#[tokio::test]
async fn export_geojson_honors_unsynced_only() {
    let store = memory_store().await;
    let a = store.append(&sample_at(100)).await.unwrap();
    store
        .append(&sample_at(200).with_altitude(15.0))
        .await
        .unwrap();
    store.mark_synced(&[a]).await.unwrap();

    let all = store.export_geojson(false).await.unwrap();
    assert_eq!(all.kind, "FeatureCollection");
    assert_eq!(all.features.len(), 2);

    let unsynced = store.export_geojson(true).await.unwrap();
    assert_eq!(unsynced.features.len(), 1);
    // Altitude shows up as the third coordinate
    assert_eq!(unsynced.features[0].geometry.coordinates.len(), 3);
}

#[tokio::test]
async fn file_backed_store_persists_across_pools() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("locations.db");

    {
        let pool = DatabasePool::new(&db_path).await.unwrap();
        let store = SqliteOfflineStore::new(pool.pool().clone());
        store.append(&sample_at(100)).await.unwrap();
    }

    let pool = DatabasePool::new(&db_path).await.unwrap();
    let store = SqliteOfflineStore::new(pool.pool().clone());
    assert_eq!(store.count().await.unwrap(), 1);
}
