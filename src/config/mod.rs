use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// `None` runs the service on the in-memory store
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub max_connections: u32,
    /// Seconds before an in-flight request is answered with 408
    pub request_timeout: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            jwt_secret: lookup("JWT_SECRET")
                .filter(|secret| !secret.is_empty())
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            max_connections: lookup("MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("MAX_CONNECTIONS must be a positive integer: {}", e))?,
            request_timeout: lookup("REQUEST_TIMEOUT")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("REQUEST_TIMEOUT must be a number of seconds: {}", e))?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
