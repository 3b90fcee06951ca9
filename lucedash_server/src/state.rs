//! Shared server state: the dataset, loaded once and never mutated.

use std::sync::Arc;

use lucedash::Dataset;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}
