//! Application startup and initialization logic

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::auth::JwtService;
use crate::config::Config;
use crate::database::{self, InMemoryDatabase, PgCarRepository, PgUserCarRepository};
use crate::database::repository::{CarRepository, UserCarRepository};
use crate::handlers::cars::CarController;
use crate::services::SystemDateProvider;

/// Connect the persistence layer and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!(environment = %config.environment, "Starting car rental API");

    let (cars, rentals): (Arc<dyn CarRepository>, Arc<dyn UserCarRepository>) =
        match &config.database_url {
            Some(url) => {
                let pool = database::setup_database(url, config.max_connections).await?;
                info!("PostgreSQL connection established");

                database::run_migrations(&pool).await?;

                (
                    Arc::new(PgCarRepository::new(pool.clone())),
                    Arc::new(PgUserCarRepository::new(pool)),
                )
            }
            None => {
                if config.is_production() {
                    anyhow::bail!("DATABASE_URL is required in production");
                }
                warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");

                let db = InMemoryDatabase::new();
                (Arc::new(db.clone()), Arc::new(db))
            }
        };

    let jwt_service = JwtService::new(&config.jwt_secret);

    Ok(AppState {
        config: config.clone(),
        jwt_service,
        cars: CarController::new(cars, rentals, Arc::new(SystemDateProvider)),
    })
}
