//! Record shapes for the three metric tables and the loaded dataset.
//! Records are immutable once loaded; timestamps are already normalised to UTC.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskRecord {
    pub timestamp: DateTime<Utc>,
    pub available_space_gb: f64,
    pub used_space_gb: f64,
    pub device_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuRecord {
    pub timestamp: DateTime<Utc>,
    pub used_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord {
    pub timestamp: DateTime<Utc>,
    pub used_percent: f64,
    pub used_gb: f64,
}

/// All three record sets, in storage order. Shared read-only by every session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub disk: Vec<DiskRecord>,
    pub cpu: Vec<CpuRecord>,
    pub memory: Vec<MemoryRecord>,
    devices: Vec<String>,
}

impl Dataset {
    pub fn new(disk: Vec<DiskRecord>, cpu: Vec<CpuRecord>, memory: Vec<MemoryRecord>) -> Self {
        let mut devices: Vec<String> = Vec::new();
        for r in &disk {
            if !devices.iter().any(|d| d == &r.device_key) {
                devices.push(r.device_key.clone());
            }
        }
        Self {
            disk,
            cpu,
            memory,
            devices,
        }
    }

    /// Distinct disk device keys in first-seen order.
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    pub fn has_device(&self, key: &str) -> bool {
        self.devices.iter().any(|d| d == key)
    }

    /// None when the disk record set is empty.
    pub fn default_device(&self) -> Option<&str> {
        self.devices.first().map(String::as_str)
    }
}
