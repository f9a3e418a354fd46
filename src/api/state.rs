//! Application state shared by all handlers

use std::sync::Arc;

use crate::domain::repositories::Repositories;

/// Settings the HTTP layer needs at request time
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Secret used to verify bearer tokens
    pub jwt_secret: String,
    /// Prefix of the alert headers, e.g. `X-courseteams-alert`
    pub application_name: String,
}

/// Application state: repositories plus API settings
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(repositories: Repositories, settings: ApiSettings) -> Self {
        Self {
            repositories,
            settings: Arc::new(settings),
        }
    }
}
