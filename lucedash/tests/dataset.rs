//! Loading the three metric tables from SQLite.
mod common;

use chrono::{TimeZone, Utc};
use lucedash::dataset::load;
use lucedash::DashError;
use rusqlite::Connection;

#[test]
fn loads_all_three_tables() {
    let td = tempfile::tempdir().unwrap();
    let path = common::sample_db(td.path());

    let ds = load(&path).expect("load sample db");
    assert_eq!(ds.disk.len(), 6);
    assert_eq!(ds.cpu.len(), 2);
    assert_eq!(ds.memory.len(), 3);
    assert_eq!(ds.devices(), ["sda".to_string(), "sdb".to_string()]);
    assert_eq!(ds.default_device(), Some("sda"));

    assert_eq!(
        ds.disk[0].timestamp,
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(ds.disk[1].device_key, "sdb");
    assert_eq!(ds.memory[1].used_gb, 8.0);
}

#[test]
fn missing_file_is_storage_unavailable() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("nope.sqlite");
    assert!(matches!(
        load(&path),
        Err(DashError::StorageUnavailable { .. })
    ));
    // never created as a side effect
    assert!(!path.exists());
}

#[test]
fn non_database_file_is_storage_unavailable() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("garbage.sqlite");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();
    assert!(matches!(
        load(&path),
        Err(DashError::StorageUnavailable { .. })
    ));
}

#[test]
fn missing_column_is_schema_mismatch() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("db.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE disk_metrics (timestamp TEXT, available_space_gb REAL, used_space_gb REAL, key TEXT);
         CREATE TABLE cpu_metrics (timestamp TEXT);
         CREATE TABLE memory_metrics (used_percent REAL, used_gb REAL, timestamp TEXT);",
    )
    .unwrap();
    drop(conn);

    match load(&path) {
        Err(DashError::SchemaMismatch { table, detail }) => {
            assert_eq!(table, "cpu_metrics");
            assert!(detail.contains("used_percent"), "{detail}");
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn missing_table_is_schema_mismatch() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("db.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE disk_metrics (timestamp TEXT, available_space_gb REAL, used_space_gb REAL, key TEXT);")
        .unwrap();
    drop(conn);

    match load(&path) {
        Err(DashError::SchemaMismatch { table, .. }) => assert_eq!(table, "cpu_metrics"),
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn unreadable_timestamp_fails_the_load() {
    let td = tempfile::tempdir().unwrap();
    let path = common::empty_db(td.path());
    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO cpu_metrics VALUES (10.0, 'last tuesday')",
        [],
    )
    .unwrap();
    drop(conn);

    match load(&path) {
        Err(DashError::InvalidTimestamp { table, value }) => {
            assert_eq!(table, "cpu_metrics");
            assert_eq!(value, "last tuesday");
        }
        other => panic!("expected InvalidTimestamp, got {other:?}"),
    }
}

#[test]
fn empty_tables_load_without_devices() {
    let td = tempfile::tempdir().unwrap();
    let path = common::empty_db(td.path());
    let ds = load(&path).unwrap();
    assert!(ds.disk.is_empty());
    assert!(ds.devices().is_empty());
    assert_eq!(ds.default_device(), None);
}

#[test]
fn epoch_and_null_values() {
    let td = tempfile::tempdir().unwrap();
    let path = common::empty_db(td.path());
    let conn = Connection::open(&path).unwrap();
    conn.execute("INSERT INTO memory_metrics VALUES (NULL, 4, 1700000000)", [])
        .unwrap();
    drop(conn);

    let ds = load(&path).unwrap();
    let m = &ds.memory[0];
    assert!(m.used_percent.is_nan());
    assert_eq!(m.used_gb, 4.0);
    assert_eq!(m.timestamp.timestamp(), 1_700_000_000);
}
