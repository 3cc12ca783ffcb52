use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{OpenApi, ToSchema};

use crate::config::Config;
use crate::error::ErrorResponse;
use crate::openapi::ApiDoc;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub environment: String,
}

impl HealthStatus {
    pub fn new(environment: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: environment.to_string(),
        }
    }
}

/// Liveness banner
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = RootResponse)
    )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "OK".to_string(),
        message: "Car rental API is up and running!".to_string(),
    })
}

/// Basic health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus)
    )
)]
pub async fn health_check(State(config): State<Config>) -> Json<HealthStatus> {
    Json(HealthStatus::new(&config.environment))
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Fallback for unknown routes
pub async fn not_found(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<ErrorResponse>) {
    let body = ErrorResponse::new("Error", "Not found!").with_details(json!({
        "method": method.as_str(),
        "url": uri.to_string(),
    }));

    (StatusCode::NOT_FOUND, Json(body))
}
