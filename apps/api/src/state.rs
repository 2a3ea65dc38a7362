use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::store::EvaluationStore;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `LlmClient` in production, a scripted model in tests.
    pub llm: Arc<dyn ChatModel>,
    pub evaluations: EvaluationStore,
    pub config: Config,
}
