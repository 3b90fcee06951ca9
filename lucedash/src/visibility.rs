//! Which control group the page shows. Exactly one group exists at a time, selected
//! by the active table; the flags form is derived from the variant.

use serde::Serialize;

use crate::selection::{CpuColumn, DiskColumn, MemoryColumn, SelectionState, Table};
use crate::types::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub disk: bool,
    pub cpu: bool,
    pub memory: bool,
}

/// Total over `Table`: one flag set, the one for `active`.
pub fn resolve_visibility(active: Table) -> Visibility {
    Visibility {
        disk: active == Table::Disk,
        cpu: active == Table::Cpu,
        memory: active == Table::Memory,
    }
}

/// The controls rendered for the active table, with their current values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "table", rename_all = "lowercase")]
pub enum ControlGroup {
    Disk {
        column: DiskColumn,
        device: Option<String>,
        devices: Vec<String>,
    },
    Cpu {
        column: CpuColumn,
    },
    Memory {
        column: MemoryColumn,
    },
}

impl ControlGroup {
    pub fn for_selection(state: &SelectionState, dataset: &Dataset) -> Self {
        match state.active_table {
            Table::Disk => ControlGroup::Disk {
                column: state.disk_column,
                device: state.disk_device.clone(),
                devices: dataset.devices().to_vec(),
            },
            Table::Cpu => ControlGroup::Cpu {
                column: state.cpu_column,
            },
            Table::Memory => ControlGroup::Memory {
                column: state.memory_column,
            },
        }
    }

    pub fn table(&self) -> Table {
        match self {
            ControlGroup::Disk { .. } => Table::Disk,
            ControlGroup::Cpu { .. } => Table::Cpu,
            ControlGroup::Memory { .. } => Table::Memory,
        }
    }

    pub fn visibility(&self) -> Visibility {
        resolve_visibility(self.table())
    }
}
