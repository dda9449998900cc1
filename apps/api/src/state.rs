use std::sync::Arc;

use crate::agent::orchestrator::Agent;
use crate::chat_log::ChatLog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// One agent per process; it owns the shared browser session.
    pub agent: Arc<Agent>,
    pub chat_log: ChatLog,
}
