//! Closed sets of user choices and the per-session selection record.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DashError;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    #[default]
    Disk,
    Cpu,
    Memory,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Disk, Table::Cpu, Table::Memory];

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Disk => "disk",
            Table::Cpu => "cpu",
            Table::Memory => "memory",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Table::Disk => "Disk Metrics",
            Table::Cpu => "CPU Metrics",
            Table::Memory => "Memory Metrics",
        }
    }
}

impl FromStr for Table {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DashError::invalid_selection("table", s))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable value column: raw storage name plus a dropdown label.
pub trait Column: Copy + Eq + FromStr<Err = DashError> + 'static {
    const ALL: &'static [Self];
    fn as_str(self) -> &'static str;
    fn label(self) -> &'static str;
}

macro_rules! column_enum {
    ($name:ident, $field:literal, { $($variant:ident => ($raw:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $(#[serde(rename = $raw)] $variant),+
        }

        impl Column for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $raw),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = DashError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as Column>::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str() == s)
                    .ok_or_else(|| DashError::invalid_selection($field, s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

column_enum!(DiskColumn, "disk_column", {
    AvailableSpaceGb => ("available_space_gb", "Available Disk Size (GB)"),
    UsedSpaceGb => ("used_space_gb", "Used Disk Size (GB)"),
});

column_enum!(CpuColumn, "cpu_column", {
    UsedPercent => ("used_percent", "Used Percent"),
});

column_enum!(MemoryColumn, "memory_column", {
    UsedGb => ("used_gb", "Used GB"),
    UsedPercent => ("used_percent", "Used Percent"),
});

/// Everything one viewer has chosen. Only explicit user actions mutate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionState {
    pub active_table: Table,
    pub disk_column: DiskColumn,
    /// None only when the dataset holds no disk records.
    pub disk_device: Option<String>,
    pub cpu_column: CpuColumn,
    pub memory_column: MemoryColumn,
    pub theme: Theme,
}

impl SelectionState {
    /// Defaults: disk table, available space, first known device, light theme.
    pub fn with_default_device(device: Option<&str>) -> Self {
        Self {
            active_table: Table::Disk,
            disk_column: DiskColumn::AvailableSpaceGb,
            disk_device: device.map(str::to_owned),
            cpu_column: CpuColumn::UsedPercent,
            memory_column: MemoryColumn::UsedGb,
            theme: Theme::Light,
        }
    }

    /// Raw column name currently selected for `table`.
    pub fn column_for(&self, table: Table) -> &'static str {
        match table {
            Table::Disk => self.disk_column.as_str(),
            Table::Cpu => self.cpu_column.as_str(),
            Table::Memory => self.memory_column.as_str(),
        }
    }
}
