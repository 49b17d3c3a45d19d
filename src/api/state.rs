use std::sync::{Arc, RwLock};

use crate::core::AppConfig;
use crate::openai::OpenAiBackend;
use crate::story::{Orchestrator, SessionRegistry};

pub struct AppState {
    pub orchestrator: Orchestrator<OpenAiBackend>,
    // The same registry the orchestrator writes through, kept here for
    // read-only endpoints
    pub registry: Arc<RwLock<SessionRegistry>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        orchestrator: Orchestrator<OpenAiBackend>,
        registry: Arc<RwLock<SessionRegistry>>,
        config: AppConfig,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            config,
        }
    }
}
