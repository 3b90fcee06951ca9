//! Core of the lucedash metrics dashboard: loads disk/cpu/memory record sets once,
//! tracks per-session selections and derives the chart shown for them.

pub mod config;
pub mod dataset;
pub mod error;
pub mod figure;
pub mod projector;
pub mod selection;
pub mod session;
pub mod theme;
pub mod types;
pub mod visibility;

pub use error::{DashError, Result};
pub use session::Session;
pub use types::Dataset;
