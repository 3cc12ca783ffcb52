//! Response bodies and helpers for the car endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::repository::Pagination;
use crate::models::Car;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_count: i64,
    pub page_size: u32,
    pub count: i64,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, count: i64) -> Self {
        Self {
            page: pagination.page,
            page_count: pagination.page_count(count),
            page_size: pagination.page_size,
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListMeta {
    pub pagination: PaginationMeta,
}

/// Body of `GET /api/v1/cars`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CarListResponse {
    pub cars: Vec<Car>,
    pub meta: ListMeta,
}

impl CarListResponse {
    pub fn new(cars: Vec<Car>, pagination: &Pagination, count: i64) -> Self {
        Self {
            cars,
            meta: ListMeta {
                pagination: PaginationMeta::new(pagination, count),
            },
        }
    }
}

/// Response helper for created resources
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Response helper for no content
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
