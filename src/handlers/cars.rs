//! Car inventory and rental endpoints.
//!
//! `CarController` holds the injected collaborators; the `handle_*` functions
//! are the axum handlers that translate requests into collaborator calls.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::extractors::{JsonBody, ListCarsParams, QueryParams};
use super::response::{CarListResponse, Created, NoContent};
use crate::auth::AuthenticatedUser;
use crate::database::repository::{
    CarListQuery, CarRepository, RepositoryError, UserCarRepository,
};
use crate::error::{ApiError, CarAlreadyRentedError, ErrorResponse, Unprocessable};
use crate::models::{Car, CarFields, NewUserCar, RentalWindow, UserCar};
use crate::services::{DateProvider, DurationUnit};

/// Request-handling contract for cars, built over injected collaborators
#[derive(Clone)]
pub struct CarController {
    car_model: Arc<dyn CarRepository>,
    user_car_model: Arc<dyn UserCarRepository>,
    date_provider: Arc<dyn DateProvider>,
}

impl CarController {
    pub fn new(
        car_model: Arc<dyn CarRepository>,
        user_car_model: Arc<dyn UserCarRepository>,
        date_provider: Arc<dyn DateProvider>,
    ) -> Self {
        Self {
            car_model,
            user_car_model,
            date_provider,
        }
    }

    /// Resolve the car addressed by the route id
    pub async fn get_car_from_request(&self, id: i64) -> Result<Option<Car>, RepositoryError> {
        self.car_model.find_by_pk(id).await
    }

    /// Fill in the defaults for an incomplete rental window
    fn rental_window(&self, request: &RentCarRequest) -> Result<RentalWindow, ApiError> {
        let started_at = request
            .rent_started_at
            .unwrap_or_else(|| self.date_provider.now());
        let ended_at = match request.rent_ended_at {
            Some(ended_at) => ended_at,
            None => self
                .date_provider
                .add(started_at, 1, DurationUnit::Day)
                .ok_or_else(|| {
                    ApiError::Validation(
                        "rentStartedAt is too late to default rentEndedAt".into(),
                    )
                })?,
        };

        if ended_at < started_at {
            return Err(ApiError::Validation(
                "rentEndedAt must not be before rentStartedAt".into(),
            ));
        }

        Ok(RentalWindow::new(started_at, Some(ended_at)))
    }
}

/// Body of `POST /api/v1/cars/{id}/rent`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentCarRequest {
    /// Defaults to the current time
    pub rent_started_at: Option<DateTime<Utc>>,
    /// Defaults to one day after the start
    pub rent_ended_at: Option<DateTime<Utc>>,
}

/// List cars page by page
#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "cars",
    params(ListCarsParams),
    responses(
        (status = 200, description = "Page of cars", body = CarListResponse),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse)
    )
)]
pub async fn handle_list_cars(
    State(controller): State<CarController>,
    QueryParams(params): QueryParams<ListCarsParams>,
) -> Result<Json<CarListResponse>, ApiError> {
    let pagination = params.pagination();
    let filter = params.filter();
    let query = CarListQuery::new(filter.clone(), &pagination);

    let cars = controller.car_model.find_all(&query).await?;
    let count = controller.car_model.count(&filter).await?;

    debug!(
        page = pagination.page,
        page_size = pagination.page_size,
        count,
        "Listed cars"
    );

    Ok(Json(CarListResponse::new(cars, &pagination, count)))
}

/// Get a car by id
#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "The car", body = Car),
        (status = 404, description = "No such car", body = ErrorResponse)
    )
)]
pub async fn handle_get_car(
    State(controller): State<CarController>,
    Path(id): Path<i64>,
) -> Result<Json<Car>, ApiError> {
    let car = controller
        .car_model
        .find_by_pk(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", id))?;

    Ok(Json(car))
}

/// Create a car
#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "cars",
    request_body = CarFields,
    responses(
        (status = 201, description = "Car created", body = Car),
        (status = 422, description = "Rejected by the persistence layer", body = ErrorResponse)
    )
)]
pub async fn handle_create_car(
    State(controller): State<CarController>,
    JsonBody(fields): JsonBody<CarFields>,
) -> Response {
    match controller.car_model.create(fields).await {
        Ok(car) => {
            info!(car_id = car.id, name = %car.name, "Car created");
            Created(car).into_response()
        }
        Err(e) => {
            warn!(error = %e, kind = e.name(), "Car creation rejected");
            Unprocessable::from(e).into_response()
        }
    }
}

/// Rent a car for the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/cars/{id}/rent",
    tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    request_body = RentCarRequest,
    responses(
        (status = 201, description = "Rental created", body = UserCar),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "No such car", body = ErrorResponse),
        (status = 422, description = "Car already rented in the window, or invalid window", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn handle_rent_car(
    State(controller): State<CarController>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<RentCarRequest>,
) -> Result<Response, ApiError> {
    let car = controller
        .car_model
        .find_by_pk(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car", id))?;

    let window = controller.rental_window(&request)?;

    // The overlap check and the insert are separate statements, so two
    // concurrent requests for the same car can both pass the check.
    let active = controller.user_car_model.find_one(car.id, &window).await?;
    if let Some(existing) = active {
        warn!(
            car_id = car.id,
            user_id = claims.id,
            existing_rental = existing.id,
            "Car already rented in the requested window"
        );
        return Ok(CarAlreadyRentedError::new(car).into_response());
    }

    let rental = controller
        .user_car_model
        .create(NewUserCar {
            user_id: claims.id,
            car_id: car.id,
            rent_started_at: window.started_at,
            rent_ended_at: window.ended_at,
        })
        .await?;

    info!(
        car_id = car.id,
        user_id = claims.id,
        rental_id = rental.id,
        "Car rented"
    );

    Ok(Created(rental).into_response())
}

/// Update a car; absent fields keep their value
#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    request_body = CarFields,
    responses(
        (status = 200, description = "Car updated", body = Car),
        (status = 404, description = "No such car", body = ErrorResponse),
        (status = 422, description = "Rejected by the persistence layer", body = ErrorResponse)
    )
)]
pub async fn handle_update_car(
    State(controller): State<CarController>,
    Path(id): Path<i64>,
    JsonBody(fields): JsonBody<CarFields>,
) -> Result<Response, ApiError> {
    let car = match controller.get_car_from_request(id).await {
        Ok(Some(car)) => car,
        Ok(None) => return Err(ApiError::not_found("Car", id)),
        Err(e) => {
            warn!(car_id = id, error = %e, "Car lookup failed");
            return Ok(Unprocessable::from(e).into_response());
        }
    };

    match controller.car_model.update(car, fields).await {
        Ok(car) => {
            info!(car_id = car.id, "Car updated");
            Ok(Json(car).into_response())
        }
        Err(e) => {
            warn!(car_id = id, error = %e, kind = e.name(), "Car update rejected");
            Ok(Unprocessable::from(e).into_response())
        }
    }
}

/// Delete a car and its rentals
#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 204, description = "Car deleted, or already absent")
    )
)]
pub async fn handle_delete_car(
    State(controller): State<CarController>,
    Path(id): Path<i64>,
) -> Result<NoContent, ApiError> {
    let removed = controller.car_model.destroy(id).await?;
    info!(car_id = id, removed, "Car deleted");

    Ok(NoContent)
}
