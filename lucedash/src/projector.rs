//! Chart projection: turns the current selection plus the dataset into the series,
//! title and trace colour to draw. Recomputed in full on every change.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::selection::{CpuColumn, DiskColumn, MemoryColumn, SelectionState, Table};
use crate::types::{CpuRecord, Dataset, DiskRecord, MemoryRecord};
use crate::visibility::{ControlGroup, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: DateTime<Utc>,
    pub y: f64,
}

/// Fixed colour per table so the table is recognisable at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceColor {
    Blue,
    Orange,
    Green,
}

impl TraceColor {
    pub fn for_table(table: Table) -> Self {
        match table {
            Table::Disk => TraceColor::Blue,
            Table::Cpu => TraceColor::Orange,
            Table::Memory => TraceColor::Green,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TraceColor::Blue => "blue",
            TraceColor::Orange => "orange",
            TraceColor::Green => "green",
        }
    }
}

/// Everything derived from a selection. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub visible: Visibility,
    pub controls: ControlGroup,
    /// Raw column name; used as the trace name.
    pub column: &'static str,
    pub title: String,
    pub trace_color: TraceColor,
    pub series: Vec<Point>,
}

pub fn project(state: &SelectionState, dataset: &Dataset) -> DerivedView {
    let controls = ControlGroup::for_selection(state, dataset);
    let table = state.active_table;
    let column = state.column_for(table);

    let (series, title) = match table {
        Table::Disk => {
            let series = match state.disk_device.as_deref() {
                Some(device) => disk_series(&dataset.disk, device, state.disk_column),
                None => Vec::new(),
            };
            let title = match state.disk_device.as_deref() {
                Some(device) => format!("{} Over Time for {device}", column_title(column)),
                None => format!("{} Over Time", column_title(column)),
            };
            (series, title)
        }
        Table::Cpu => (
            cpu_series(&dataset.cpu, state.cpu_column),
            format!("{} Over Time", column_title(column)),
        ),
        Table::Memory => (
            memory_series(&dataset.memory, state.memory_column),
            format!("{} Over Time", column_title(column)),
        ),
    };

    DerivedView {
        visible: controls.visibility(),
        controls,
        column,
        title,
        trace_color: TraceColor::for_table(table),
        series,
    }
}

fn disk_series(records: &[DiskRecord], device: &str, column: DiskColumn) -> Vec<Point> {
    let points = records
        .iter()
        .filter(|r| r.device_key == device)
        .map(|r| Point {
            x: r.timestamp,
            y: match column {
                DiskColumn::AvailableSpaceGb => r.available_space_gb,
                DiskColumn::UsedSpaceGb => r.used_space_gb,
            },
        })
        .collect();
    sorted(points)
}

fn cpu_series(records: &[CpuRecord], column: CpuColumn) -> Vec<Point> {
    let points = records
        .iter()
        .map(|r| Point {
            x: r.timestamp,
            y: match column {
                CpuColumn::UsedPercent => r.used_percent,
            },
        })
        .collect();
    sorted(points)
}

fn memory_series(records: &[MemoryRecord], column: MemoryColumn) -> Vec<Point> {
    let points = records
        .iter()
        .map(|r| Point {
            x: r.timestamp,
            y: match column {
                MemoryColumn::UsedGb => r.used_gb,
                MemoryColumn::UsedPercent => r.used_percent,
            },
        })
        .collect();
    sorted(points)
}

// Stable: equal timestamps keep storage order.
fn sorted(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by_key(|p| p.x);
    points
}

/// `available_space_gb` -> `Available Space Gb`: underscores become spaces, then every
/// run of letters gets an upper-case first letter and lower-case rest.
pub fn column_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_presentation_rule() {
        assert_eq!(column_title("available_space_gb"), "Available Space Gb");
        assert_eq!(column_title("used_percent"), "Used Percent");
        assert_eq!(column_title("USED_gb"), "Used Gb");
        assert_eq!(column_title("used2gb"), "Used2Gb");
        assert_eq!(column_title(""), "");
    }

    #[test]
    fn colours_are_distinct_per_table() {
        let colours: Vec<_> = Table::ALL.iter().map(|t| TraceColor::for_table(*t)).collect();
        assert_eq!(colours, vec![TraceColor::Blue, TraceColor::Orange, TraceColor::Green]);
    }
}
