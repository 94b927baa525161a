//! Shared application state.

use std::sync::Arc;

use crate::config::Settings;

/// State attached to the application router.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Settings snapshot taken at startup.
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Creates the state from loaded settings.
    #[must_use]
    pub const fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}
