//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::{AppConfig, ModelSettings};
use crate::db::repository::DepositRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data source for deposit records
    pub repository: Arc<dyn DepositRepository>,
    /// Defaults applied when a request leaves a model parameter out
    pub model: Arc<ModelSettings>,
    /// Maximum request body size in bytes
    pub body_limit: usize,
}

impl AppState {
    /// Create a new application state with the given repository and default settings.
    pub fn new(repository: Arc<dyn DepositRepository>) -> Self {
        Self::from_config(repository, &AppConfig::default())
    }

    pub fn from_config(repository: Arc<dyn DepositRepository>, config: &AppConfig) -> Self {
        Self {
            repository,
            model: Arc::new(config.model.clone()),
            body_limit: config.server.body_limit,
        }
    }
}
