//! Dataset loader: opens the metrics store read-only, reads the three fixed tables
//! once, normalises timestamps to UTC and closes the connection again.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{types::ValueRef, Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::error::{DashError, Result};
use crate::types::{CpuRecord, Dataset, DiskRecord, MemoryRecord};

struct TableShape {
    name: &'static str,
    columns: &'static [&'static str],
    query: &'static str,
}

const DISK: TableShape = TableShape {
    name: "disk_metrics",
    columns: &["timestamp", "available_space_gb", "used_space_gb", "key"],
    query: "SELECT timestamp, available_space_gb, used_space_gb, key FROM disk_metrics",
};

const CPU: TableShape = TableShape {
    name: "cpu_metrics",
    columns: &["used_percent", "timestamp"],
    query: "SELECT used_percent, timestamp FROM cpu_metrics",
};

const MEMORY: TableShape = TableShape {
    name: "memory_metrics",
    columns: &["used_percent", "used_gb", "timestamp"],
    query: "SELECT used_percent, used_gb, timestamp FROM memory_metrics",
};

/// Load all three record sets from the SQLite file at `path`.
/// The file is never created; a missing or unreadable file is `StorageUnavailable`.
pub fn load(path: &Path) -> Result<Dataset> {
    let unavailable = |reason: String| DashError::StorageUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_file() {
        return Err(unavailable("file does not exist".into()));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| unavailable(e.to_string()))?;

    // Opening is lazy; touch the schema so a non-database file fails here.
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |r| r.get::<_, i64>(0))
        .map_err(|e| unavailable(e.to_string()))?;

    let dataset = load_from(&conn)?;
    conn.close().map_err(|(_, e)| DashError::Storage(e))?;

    info!(
        disk = dataset.disk.len(),
        cpu = dataset.cpu.len(),
        memory = dataset.memory.len(),
        devices = ?dataset.devices(),
        "loaded metrics from {}",
        path.display()
    );
    Ok(dataset)
}

/// Read the record sets from an already open connection.
pub fn load_from(conn: &Connection) -> Result<Dataset> {
    for shape in [&DISK, &CPU, &MEMORY] {
        check_columns(conn, shape)?;
    }

    let mut disk = Vec::new();
    let mut stmt = conn.prepare(DISK.query)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        disk.push(DiskRecord {
            timestamp: timestamp_at(row, 0, DISK.name)?,
            available_space_gb: number_at(row, 1, DISK.name, "available_space_gb")?,
            used_space_gb: number_at(row, 2, DISK.name, "used_space_gb")?,
            device_key: key_at(row, 3)?,
        });
    }

    let mut cpu = Vec::new();
    let mut stmt = conn.prepare(CPU.query)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        cpu.push(CpuRecord {
            used_percent: number_at(row, 0, CPU.name, "used_percent")?,
            timestamp: timestamp_at(row, 1, CPU.name)?,
        });
    }

    let mut memory = Vec::new();
    let mut stmt = conn.prepare(MEMORY.query)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        memory.push(MemoryRecord {
            used_percent: number_at(row, 0, MEMORY.name, "used_percent")?,
            used_gb: number_at(row, 1, MEMORY.name, "used_gb")?,
            timestamp: timestamp_at(row, 2, MEMORY.name)?,
        });
    }

    Ok(Dataset::new(disk, cpu, memory))
}

fn check_columns(conn: &Connection, shape: &TableShape) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", shape.name))?;
    let present: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<_, _>>()?;

    if present.is_empty() {
        return Err(DashError::SchemaMismatch {
            table: shape.name.into(),
            detail: "table not found".into(),
        });
    }

    let missing: Vec<&str> = shape
        .columns
        .iter()
        .copied()
        .filter(|c| !present.iter().any(|p| p.eq_ignore_ascii_case(c)))
        .collect();
    if !missing.is_empty() {
        return Err(DashError::SchemaMismatch {
            table: shape.name.into(),
            detail: format!("missing column(s) {}", missing.join(", ")),
        });
    }
    debug!(table = shape.name, "schema ok");
    Ok(())
}

fn timestamp_at(row: &Row<'_>, idx: usize, table: &str) -> Result<DateTime<Utc>> {
    let value = row.get_ref(idx)?;
    parse_timestamp(value).ok_or_else(|| DashError::InvalidTimestamp {
        table: table.into(),
        value: describe(value),
    })
}

// NULL readings become NaN so the chart shows a gap instead of failing the load.
fn number_at(row: &Row<'_>, idx: usize, table: &str, column: &str) -> Result<f64> {
    match row.get_ref(idx)? {
        ValueRef::Real(f) => Ok(f),
        ValueRef::Integer(i) => Ok(i as f64),
        ValueRef::Null => Ok(f64::NAN),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| DashError::SchemaMismatch {
                table: table.into(),
                detail: format!("non-numeric value in column '{column}'"),
            }),
        ValueRef::Blob(_) => Err(DashError::SchemaMismatch {
            table: table.into(),
            detail: format!("blob value in column '{column}'"),
        }),
    }
}

fn key_at(row: &Row<'_>, idx: usize) -> Result<String> {
    match row.get_ref(idx)? {
        ValueRef::Text(t) => Ok(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Integer(i) => Ok(i.to_string()),
        ValueRef::Real(f) => Ok(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => Err(DashError::SchemaMismatch {
            table: DISK.name.into(),
            detail: "device key must be text".into(),
        }),
    }
}

fn describe(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".into(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} byte blob>", b.len()),
    }
}

/// Integers and reals are Unix epoch seconds; text goes through `parse_timestamp_str`.
pub fn parse_timestamp(value: ValueRef<'_>) -> Option<DateTime<Utc>> {
    match value {
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0),
        ValueRef::Real(secs) if secs.is_finite() => {
            DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
        }
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(parse_timestamp_str),
        _ => None,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff][+HH:MM]`, the `T`-separated naive form,
/// a bare date, or epoch seconds as text. Naive values are taken as UTC.
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    s.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn naive_text_is_utc() {
        assert_eq!(
            parse_timestamp_str("2024-03-01 12:30:00"),
            Some(utc(2024, 3, 1, 12, 30, 0))
        );
        assert_eq!(
            parse_timestamp_str("2024-03-01T12:30:00"),
            Some(utc(2024, 3, 1, 12, 30, 0))
        );
        assert_eq!(parse_timestamp_str("2024-03-01"), Some(utc(2024, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn offsets_are_normalised() {
        assert_eq!(
            parse_timestamp_str("2024-03-01T14:30:00+02:00"),
            Some(utc(2024, 3, 1, 12, 30, 0))
        );
        assert_eq!(
            parse_timestamp_str("2024-03-01 14:30:00+02:00"),
            Some(utc(2024, 3, 1, 12, 30, 0))
        );
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let ts = parse_timestamp_str("2024-03-01 12:30:00.250").unwrap();
        assert_eq!(ts.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn epoch_values() {
        assert_eq!(
            parse_timestamp(ValueRef::Integer(1_700_000_000)),
            DateTime::from_timestamp(1_700_000_000, 0)
        );
        assert_eq!(
            parse_timestamp_str("1700000000"),
            DateTime::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp_str("yesterday"), None);
        assert_eq!(parse_timestamp(ValueRef::Null), None);
    }
}
