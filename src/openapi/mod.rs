use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::error::{ErrorDetail, ErrorResponse};
use crate::handlers::cars::RentCarRequest;
use crate::handlers::health::{HealthStatus, RootResponse};
use crate::handlers::response::{CarListResponse, ListMeta, PaginationMeta};
use crate::models::{Car, CarFields, CarSize, UserCar};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Car Rental API",
        description = "Car inventory and rental management"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        crate::handlers::health::root,
        crate::handlers::health::health_check,
        crate::handlers::cars::handle_list_cars,
        crate::handlers::cars::handle_get_car,
        crate::handlers::cars::handle_create_car,
        crate::handlers::cars::handle_rent_car,
        crate::handlers::cars::handle_update_car,
        crate::handlers::cars::handle_delete_car,
    ),
    components(schemas(
        Car,
        CarFields,
        CarSize,
        UserCar,
        RentCarRequest,
        CarListResponse,
        ListMeta,
        PaginationMeta,
        ErrorResponse,
        ErrorDetail,
        HealthStatus,
        RootResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service status"),
        (name = "cars", description = "Car inventory and rentals"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token signed with JWT_SECRET"))
                        .build(),
                ),
            )
        }
    }
}
