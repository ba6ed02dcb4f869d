use std::sync::Arc;

use crate::coaching::interview::SeedSource;
use crate::config::Config;
use crate::llm_client::Dispatcher;
use crate::store::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub config: Config,
    /// Storage seam for analysis history. Default: in-memory.
    pub history: Arc<dyn HistoryStore>,
    /// Entropy for question-generation prompts. Fixed in tests.
    pub seed: Arc<dyn SeedSource>,
}
