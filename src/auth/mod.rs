use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod jwt;
pub mod middleware;

pub use jwt::JwtService;
pub use middleware::{auth_middleware, AuthenticatedUser};

/// User claims carried by bearer tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub id: i64,         // User ID
    pub email: String,
    pub role: String,
    pub iat: i64,        // Issued at
    pub exp: i64,        // Expiration time
}

impl Claims {
    pub fn new(id: i64, email: impl Into<String>, role: impl Into<String>) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(24); // 24 hour expiration

        Self {
            id,
            email: email.into(),
            role: role.into(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}
