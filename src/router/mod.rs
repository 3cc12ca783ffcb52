//! Router configuration module - RESTful v1 API

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::auth::auth_middleware;
use crate::handlers::cars::{
    handle_create_car, handle_delete_car, handle_get_car, handle_list_cars, handle_rent_car,
    handle_update_car,
};
use crate::handlers::health::{health_check, not_found, openapi_json, root};
use crate::middleware::request_logger_middleware;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let service = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/docs/openapi.json", get(openapi_json));

    let v1_api = Router::new().nest("/cars", car_routes(&app_state)); // /api/v1/cars

    service
        .nest("/api/v1", v1_api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_logger_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    axum::http::StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(app_state.config.request_timeout),
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

fn car_routes(app_state: &AppState) -> Router<AppState> {
    // Only renting needs the acting user
    let rent = Router::new()
        .route("/{id}/rent", post(handle_rent_car))
        .route_layer(from_fn_with_state(
            app_state.jwt_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handle_list_cars).post(handle_create_car))
        .route(
            "/{id}",
            get(handle_get_car)
                .put(handle_update_car)
                .delete(handle_delete_car),
        )
        .merge(rent)
}
