use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use car_rental_api::auth::{Claims, JwtService};
use car_rental_api::{build_router, initialize_app, Config};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

async fn setup_test_app() -> Result<Router> {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "ENVIRONMENT" => Some("test".to_string()),
        _ => None,
    })?;

    let app_state = initialize_app(&config).await?;
    Ok(build_router(app_state))
}

fn bearer(user_id: i64) -> Result<String> {
    let token = JwtService::new(SECRET).issue(&Claims::new(
        user_id,
        "customer@binar.co.id",
        "CUSTOMER",
    ))?;
    Ok(format!("Bearer {}", token))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    auth: Option<&str>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

async fn create_car(app: &Router, name: &str, size: &str) -> Result<Value> {
    let (status, car) = send(
        app,
        Method::POST,
        "/api/v1/cars",
        Some(json!({
            "name": name,
            "price": 300000,
            "size": size,
            "image": "https://source.unsplash.com/500x500"
        })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(car)
}

#[tokio::test]
async fn test_car_lifecycle() -> Result<()> {
    let app = setup_test_app().await?;

    let car = create_car(&app, "Mazda RX4", "SMALL").await?;
    let uri = format!("/api/v1/cars/{}", car["id"]);
    assert_eq!(car["name"], "Mazda RX4");
    assert_eq!(car["isCurrentlyRented"], false);

    let (status, fetched) = send(&app, Method::GET, &uri, None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, car);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Mazda RX4 Wag" })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Mazda RX4 Wag");
    assert_eq!(updated["size"], "SMALL");

    let (status, body) = send(&app, Method::DELETE, &uri, None, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &uri, None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["name"], "NotFoundError");

    // Deleting again still answers 204
    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_create_rejection_is_unprocessable() -> Result<()> {
    let app = setup_test_app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/cars",
        Some(json!({ "name": "Valiant", "price": 100000 })),
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "ValidationError");
    assert_eq!(
        body["error"]["message"],
        "notNull Violation: Car.size cannot be null"
    );

    Ok(())
}

#[tokio::test]
async fn test_update_missing_car() -> Result<()> {
    let app = setup_test_app().await?;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/cars/77",
        Some(json!({ "name": "Ghost" })),
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_list_pagination_and_filters() -> Result<()> {
    let app = setup_test_app().await?;

    let (status, body) = send(&app, Method::GET, "/api/v1/cars", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "cars": [],
            "meta": { "pagination": { "page": 1, "pageCount": 0, "pageSize": 10, "count": 0 } }
        })
    );

    for (name, size) in [
        ("Mazda RX4", "SMALL"),
        ("Datsun 710", "MEDIUM"),
        ("Hornet 4 Drive", "LARGE"),
        ("Valiant", "SMALL"),
        ("Duster 360", "LARGE"),
    ] {
        create_car(&app, name, size).await?;
    }

    let (_, body) = send(&app, Method::GET, "/api/v1/cars?page=2&pageSize=2", None, None).await?;
    assert_eq!(body["cars"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["cars"][0]["name"], "Hornet 4 Drive");
    assert_eq!(
        body["meta"]["pagination"],
        json!({ "page": 2, "pageCount": 3, "pageSize": 2, "count": 5 })
    );

    let (_, body) = send(&app, Method::GET, "/api/v1/cars?size=LARGE", None, None).await?;
    assert_eq!(body["meta"]["pagination"]["count"], 2);

    let (status, body) = send(&app, Method::GET, "/api/v1/cars?size=HUGE", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["name"], "BadRequestError");

    Ok(())
}

#[tokio::test]
async fn test_rent_flow() -> Result<()> {
    let app = setup_test_app().await?;
    let car = create_car(&app, "Datsun 710", "MEDIUM").await?;
    let rent_uri = format!("/api/v1/cars/{}/rent", car["id"]);
    let window = json!({
        "rentStartedAt": "2022-01-01T00:00:00Z",
        "rentEndedAt": "2022-01-02T00:00:00Z"
    });

    let (status, body) = send(&app, Method::POST, &rent_uri, Some(window.clone()), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["name"], "UnauthorizedError");

    let auth = bearer(7)?;
    let (status, rental) =
        send(&app, Method::POST, &rent_uri, Some(window.clone()), Some(&auth)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rental["userId"], 7);
    assert_eq!(rental["carId"], car["id"]);
    assert_eq!(rental["rentEndedAt"], "2022-01-02T00:00:00Z");

    let (status, body) = send(&app, Method::POST, &rent_uri, Some(window), Some(&auth)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "error": {
                "name": "CarAlreadyRentedError",
                "message": "Datsun 710 is already rented!!",
                "details": { "carId": car["id"] }
            }
        })
    );

    // Omitted end defaults to one day after the start
    let (status, rental) = send(
        &app,
        Method::POST,
        &rent_uri,
        Some(json!({ "rentStartedAt": "2022-02-01T00:00:00Z" })),
        Some(&auth),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rental["rentEndedAt"], "2022-02-02T00:00:00Z");

    let (_, listing) = send(
        &app,
        Method::GET,
        "/api/v1/cars?availableAt=2022-02-01T12:00:00Z",
        None,
        None,
    )
    .await?;
    assert_eq!(listing["meta"]["pagination"]["count"], 0);

    Ok(())
}

#[tokio::test]
async fn test_rent_rejects_invalid_windows() -> Result<()> {
    let app = setup_test_app().await?;
    let car = create_car(&app, "Fiat 128", "SMALL").await?;
    let rent_uri = format!("/api/v1/cars/{}/rent", car["id"]);
    let auth = bearer(3)?;

    let (status, _) = send(
        &app,
        Method::POST,
        &rent_uri,
        Some(json!({
            "rentStartedAt": "2022-01-01T00:00:00Z",
            "rentEndedAt": "2022-01-02T00:00:00Z"
        })),
        Some(&auth),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    // Reversed window covering Jan 1 12:00 to Jan 2 12:00
    let (status, body) = send(
        &app,
        Method::POST,
        &rent_uri,
        Some(json!({
            "rentStartedAt": "2022-01-02T12:00:00Z",
            "rentEndedAt": "2022-01-01T12:00:00Z"
        })),
        Some(&auth),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "ValidationError");

    let (status, body) = send(
        &app,
        Method::POST,
        &rent_uri,
        Some(json!({ "rentStartedAt": "+262142-12-31T23:00:00Z" })),
        Some(&auth),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "ValidationError");

    Ok(())
}

#[tokio::test]
async fn test_rent_missing_car() -> Result<()> {
    let app = setup_test_app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/cars/404/rent",
        Some(json!({})),
        Some(&bearer(1)?),
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["name"], "NotFoundError");
    Ok(())
}

#[tokio::test]
async fn test_malformed_body() -> Result<()> {
    let app = setup_test_app().await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/cars")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/cars",
        Some(json!({ "name": "Valiant", "price": 1, "size": "SMALL", "image": 42 })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["name"], "ValidationError");

    Ok(())
}

#[tokio::test]
async fn test_service_routes() -> Result<()> {
    let app = setup_test_app().await?;

    let (status, body) = send(&app, Method::GET, "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");

    let (status, body) = send(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "test");

    let (status, body) = send(&app, Method::GET, "/api/docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/cars/{id}/rent"].is_object());

    let (status, body) = send(&app, Method::GET, "/api/v1/trucks", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "error": {
                "name": "Error",
                "message": "Not found!",
                "details": { "method": "GET", "url": "/api/v1/trucks" }
            }
        })
    );

    Ok(())
}
