use std::sync::Arc;

use outfred_pipeline::orchestrator::ImportRunner;
use outfred_pipeline::store::SessionStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Import session store (single source of truth for run state).
    pub store: Arc<SessionStore>,
    /// Orchestrator that executes import runs.
    pub runner: Arc<ImportRunner>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
