//! Application state shared across all handlers.

use axum::extract::FromRef;

use crate::auth::JwtService;
use crate::config::Config;
use crate::handlers::cars::CarController;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Bearer token verification
    pub jwt_service: JwtService,
    /// Car endpoints with their injected collaborators
    pub cars: CarController,
}

impl FromRef<AppState> for Config {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jwt_service.clone()
    }
}

impl FromRef<AppState> for CarController {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cars.clone()
    }
}
