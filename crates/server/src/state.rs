//! Shared application state.

use std::sync::Arc;

use lectio_client::TextProvider;
use lectio_core::{AppConfig, TextCache};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cache: Arc<TextCache>,
    pub provider: TextProvider,
}

impl AppState {
    pub fn new(config: AppConfig, cache: Arc<TextCache>, provider: TextProvider) -> Self {
        Self { config: Arc::new(config), cache, provider }
    }
}
