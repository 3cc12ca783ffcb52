pub mod app_state;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod router;
pub mod services;
pub mod startup;

pub use app_state::AppState;
pub use config::Config;
pub use error::{ApiError, CarAlreadyRentedError};
pub use handlers::cars::CarController;
pub use router::build_router;
pub use startup::initialize_app;
