//! Request extractors shared by the car handlers.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::IntoParams;

use crate::database::repository::{CarFilter, Pagination};
use crate::error::ApiError;
use crate::models::CarSize;

/// Query string accepted by the car listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListCarsParams {
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Records per page (default 10, at most 100)
    pub page_size: Option<u32>,
    pub size: Option<CarSize>,
    /// Only cars without a rental covering this instant
    pub available_at: Option<DateTime<Utc>>,
}

impl ListCarsParams {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }

    pub fn filter(&self) -> CarFilter {
        CarFilter {
            size: self.size,
            available_at: self.available_at,
        }
    }
}

/// `Query` whose rejection renders through [`ApiError`]
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(QueryParams(value))
    }
}

/// `Json` whose rejection renders through [`ApiError`]
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
