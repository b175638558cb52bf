use std::sync::Arc;

use crate::chains::Chains;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ResumeStore,
    /// Text-generation backend. `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
    /// The six prompt chains, built once at startup.
    pub chains: Arc<Chains>,
    pub config: Config,
}
