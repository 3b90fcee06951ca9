//! Throwaway metrics databases for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

pub const SCHEMA: &str = "
CREATE TABLE disk_metrics (timestamp TEXT, available_space_gb REAL, used_space_gb REAL, key TEXT);
CREATE TABLE cpu_metrics (used_percent REAL, timestamp TEXT);
CREATE TABLE memory_metrics (used_percent REAL, used_gb REAL, timestamp TEXT);
";

/// Two devices; sdb rows are inserted out of timestamp order.
pub fn sample_db(dir: &Path) -> PathBuf {
    let path = dir.join("database.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    let disk = [
        ("2024-05-01 10:00:00", 100.0, 400.0, "sda"),
        ("2024-05-01 10:00:00", 50.0, 950.0, "sdb"),
        ("2024-05-01 10:05:00", 98.5, 401.5, "sda"),
        ("2024-05-01 10:10:00", 47.0, 953.0, "sdb"),
        ("2024-05-01 10:05:00", 48.0, 952.0, "sdb"),
        ("2024-05-01 10:10:00", 97.0, 403.0, "sda"),
    ];
    for (ts, avail, used, key) in disk {
        conn.execute(
            "INSERT INTO disk_metrics VALUES (?1, ?2, ?3, ?4)",
            params![ts, avail, used, key],
        )
        .unwrap();
    }

    for (pct, ts) in [(12.5, "2024-05-01 10:00:00"), (40.0, "2024-05-01 10:05:00")] {
        conn.execute("INSERT INTO cpu_metrics VALUES (?1, ?2)", params![pct, ts])
            .unwrap();
    }

    for (pct, gb, ts) in [
        (55.0, 8.8, "2024-05-01T10:05:00+00:00"),
        (50.0, 8.0, "2024-05-01T10:00:00+00:00"),
        (60.0, 9.6, "2024-05-01T10:10:00+00:00"),
    ] {
        conn.execute(
            "INSERT INTO memory_metrics VALUES (?1, ?2, ?3)",
            params![pct, gb, ts],
        )
        .unwrap();
    }
    path
}

pub fn empty_db(dir: &Path) -> PathBuf {
    let path = dir.join("empty.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    path
}
