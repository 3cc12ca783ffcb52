use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::repository::RepositoryError;
use crate::models::Car;

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                name: name.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl From<&RepositoryError> for ErrorResponse {
    fn from(err: &RepositoryError) -> Self {
        ErrorResponse::new(err.name(), err.to_string())
    }
}

/// Rejection of a persistence operation that the handler resolves itself
pub struct Unprocessable(pub ErrorResponse);

impl IntoResponse for Unprocessable {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self.0)).into_response()
    }
}

impl From<RepositoryError> for Unprocessable {
    fn from(err: RepositoryError) -> Self {
        Unprocessable(ErrorResponse::from(&err))
    }
}

/// Domain error: the car already has a rental overlapping the requested window
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} is already rented!!", .car.name)]
pub struct CarAlreadyRentedError {
    pub car: Car,
}

impl CarAlreadyRentedError {
    pub const NAME: &'static str = "CarAlreadyRentedError";

    pub fn new(car: Car) -> Self {
        Self { car }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse::new(Self::NAME, self.to_string())
            .with_details(json!({ "carId": self.car.id }))
    }
}

impl IntoResponse for CarAlreadyRentedError {
    fn into_response(self) -> Response {
        Unprocessable(self.to_response_body()).into_response()
    }
}

/// Failures forwarded to the central error renderer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Helper: Resource not found
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{} with id {} not found", resource, id))
    }

    fn name(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequestError",
            ApiError::Unauthorized(_) => "UnauthorizedError",
            ApiError::NotFound(_) => "NotFoundError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Repository(err) => err.name(),
            ApiError::Internal(_) => "InternalServerError",
        }
    }

    /// Get status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Repository(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log error with appropriate level
    fn log_error(&self, request_id: &str) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    request_id = %request_id,
                    error = %self,
                    kind = self.name(),
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    request_id = %request_id,
                    error = %self,
                    kind = self.name(),
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse::new(self.name(), self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        self.log_error(&request_id);

        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                ApiError::BadRequest("Invalid JSON format".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("JSON content type required".to_string())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}
