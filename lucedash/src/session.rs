//! One viewer's selection state over the shared dataset. Setters validate against
//! the closed choice sets and the known device keys; a rejected value leaves the
//! previous selection in place.

use std::sync::Arc;

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::{DashError, Result};
use crate::projector::{project, DerivedView};
use crate::selection::{Column, SelectionState, Table};
use crate::theme::{Theme, THEME_PARAM};
use crate::types::Dataset;

pub const TABLE_PARAM: &str = "table";
pub const DISK_COLUMN_PARAM: &str = "disk_column";
pub const DISK_DEVICE_PARAM: &str = "disk_device";
pub const CPU_COLUMN_PARAM: &str = "cpu_column";
pub const MEMORY_COLUMN_PARAM: &str = "memory_column";

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    state: SelectionState,
}

impl Session {
    /// Fresh session with every default applied.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let state = SelectionState::with_default_device(dataset.default_device());
        Self { dataset, state }
    }

    /// Rebuild a session from the page query string. Known keys are applied in a fixed
    /// order through the setters; unknown keys are ignored and rejected values are
    /// logged and dropped, so the result is always a consistent selection.
    pub fn from_query(dataset: Arc<Dataset>, query: Option<&str>) -> Self {
        let mut session = Session::new(dataset);
        let Some(q) = query else {
            return session;
        };

        let pairs: Vec<(String, String)> =
            form_urlencoded::parse(q.trim_start_matches('?').as_bytes())
                .into_owned()
                .collect();
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let applied = [
            first(DISK_COLUMN_PARAM).map(|v| session.set_column(Table::Disk, v)),
            first(DISK_DEVICE_PARAM).map(|v| session.set_device(v)),
            first(CPU_COLUMN_PARAM).map(|v| session.set_column(Table::Cpu, v)),
            first(MEMORY_COLUMN_PARAM).map(|v| session.set_column(Table::Memory, v)),
            first(TABLE_PARAM).map(|v| session.set_active_table(v)),
            first(THEME_PARAM).map(|v| session.set_theme(v)),
        ];
        for err in applied.into_iter().flatten().filter_map(|r| r.err()) {
            warn!("ignoring {err}");
        }
        session
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn set_active_table(&mut self, table: &str) -> Result<()> {
        self.state.active_table = table.parse()?;
        Ok(())
    }

    /// `column` must belong to `table`'s column set.
    pub fn set_column(&mut self, table: Table, column: &str) -> Result<()> {
        match table {
            Table::Disk => self.state.disk_column = column.parse()?,
            Table::Cpu => self.state.cpu_column = column.parse()?,
            Table::Memory => self.state.memory_column = column.parse()?,
        }
        Ok(())
    }

    /// `device` must be one of the disk keys present at load time.
    pub fn set_device(&mut self, device: &str) -> Result<()> {
        if !self.dataset.has_device(device) {
            return Err(DashError::invalid_selection(DISK_DEVICE_PARAM, device));
        }
        self.state.disk_device = Some(device.to_owned());
        Ok(())
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        let next: Theme = theme.parse()?;
        if next != self.state.theme {
            debug!(from = %self.state.theme, to = %next, "theme switched");
        }
        self.state.theme = next;
        Ok(())
    }

    pub fn view(&self) -> DerivedView {
        project(&self.state, &self.dataset)
    }

    /// Every selection as (key, value) pairs, in the order the page submits them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let s = &self.state;
        let mut pairs = vec![
            (TABLE_PARAM, s.active_table.as_str().to_owned()),
            (DISK_COLUMN_PARAM, s.disk_column.as_str().to_owned()),
        ];
        if let Some(device) = &s.disk_device {
            pairs.push((DISK_DEVICE_PARAM, device.clone()));
        }
        pairs.push((CPU_COLUMN_PARAM, s.cpu_column.as_str().to_owned()));
        pairs.push((MEMORY_COLUMN_PARAM, s.memory_column.as_str().to_owned()));
        pairs.push((THEME_PARAM, s.theme.as_str().to_owned()));
        pairs
    }

    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.query_pairs() {
            out.append_pair(k, &v);
        }
        out.finish()
    }
}
