//! Error taxonomy for loading the dataset and applying user selections.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    /// The store could not be opened at all.
    #[error("storage unavailable at {}: {reason}", path.display())]
    StorageUnavailable { path: PathBuf, reason: String },

    /// A table or one of its expected columns is missing, or a value has the wrong type.
    #[error("schema mismatch in table '{table}': {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("unrecognised timestamp '{value}' in table '{table}'")]
    InvalidTimestamp { table: String, value: String },

    /// A user tried to select a value outside the known enum or device set.
    #[error("invalid selection for {field}: '{value}'")]
    InvalidSelection { field: &'static str, value: String },

    #[error("storage query failed: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    pub fn invalid_selection(field: &'static str, value: impl Into<String>) -> Self {
        DashError::InvalidSelection {
            field,
            value: value.into(),
        }
    }

    /// Short sentence suitable for the terminal or a page banner.
    pub fn user_message(&self) -> String {
        match self {
            DashError::StorageUnavailable { path, reason } => {
                format!("Cannot open metrics database {}: {reason}", path.display())
            }
            DashError::SchemaMismatch { table, detail } => {
                format!("Metrics table '{table}' does not have the expected shape: {detail}")
            }
            DashError::InvalidTimestamp { table, value } => {
                format!("Metrics table '{table}' holds an unreadable timestamp '{value}'")
            }
            DashError::InvalidSelection { field, value } => {
                format!("'{value}' is not a valid choice for {field}")
            }
            DashError::Storage(e) => format!("Metrics database error: {e}"),
        }
    }
}
