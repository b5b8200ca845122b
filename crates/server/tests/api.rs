use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::ServerState;

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();

    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    server::router(ServerState {
        engine: std::sync::Arc::new(tokio::sync::RwLock::new(engine)),
        db,
    })
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth("alice", "password"));

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn parse(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

async fn create_vehicle(router: &Router, name: &str) -> String {
    let (status, body) = send(router, "POST", "/vehicle", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK);
    parse(&body)["id"].as_str().unwrap().to_string()
}

fn fill_up(vehicle_id: &str, current: f64, previous: Option<f64>) -> Value {
    json!({
        "vehicle_id": vehicle_id,
        "date": "2024-03-09T08:30:00+01:00",
        "current_miles": current,
        "previous_miles": previous,
        "price_per_gallon": 3.5,
        "gallons": 10.0,
        "total_cost": 35.0,
        "is_partial_fill_up": false,
        "notes": null,
    })
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let router = test_router().await;

    let request = Request::builder()
        .method("GET")
        .uri("/vehicles")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let router = test_router().await;

    let request = Request::builder()
        .method("GET")
        .uri("/vehicles")
        .header(header::AUTHORIZATION, basic_auth("alice", "nope"))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_vehicle_and_log_fill_up() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router, "Civic").await;

    let (status, body) = send(
        &router,
        "POST",
        "/fillUp",
        Some(fill_up(&vehicle_id, 10_300.0, Some(10_000.0))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(parse(&body)["id"].as_str().is_some());

    let (status, body) = send(
        &router,
        "GET",
        "/stats",
        Some(json!({ "vehicle_id": vehicle_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stats = parse(&body);
    assert_eq!(stats["fill_up_count"], 1);
    assert_eq!(stats["total_miles"], 300.0);
    assert_eq!(stats["average_mpg"], 30.0);
}

#[tokio::test]
async fn duplicate_vehicle_name_is_a_conflict() {
    let router = test_router().await;
    create_vehicle(&router, "Civic").await;

    let (status, _) = send(&router, "POST", "/vehicle", Some(json!({ "name": "Civic" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_vehicle_is_not_found() {
    let router = test_router().await;

    let (status, _) = send(
        &router,
        "GET",
        "/stats",
        Some(json!({ "vehicle_id": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn backwards_odometer_is_unprocessable() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router, "Civic").await;

    let (status, _) = send(
        &router,
        "POST",
        "/fillUp",
        Some(fill_up(&vehicle_id, 9_000.0, Some(10_000.0))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_records_returns_derived_metrics() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router, "Civic").await;
    send(
        &router,
        "POST",
        "/fillUp",
        Some(fill_up(&vehicle_id, 10_300.0, Some(10_000.0))),
    )
    .await;

    let (status, body) = send(
        &router,
        "GET",
        "/records",
        Some(json!({ "vehicle_id": vehicle_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = parse(&body);
    assert_eq!(records["records"].as_array().unwrap().len(), 1);
    assert_eq!(records["records"][0]["miles_driven"], 300.0);
    assert_eq!(records["records"][0]["mpg"], 30.0);
}

#[tokio::test]
async fn update_and_delete_record() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router, "Civic").await;
    let (_, body) = send(
        &router,
        "POST",
        "/fillUp",
        Some(fill_up(&vehicle_id, 10_300.0, Some(10_000.0))),
    )
    .await;
    let record_id = parse(&body)["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        "PATCH",
        &format!("/records/{record_id}"),
        Some(json!({
            "vehicle_id": vehicle_id,
            "date": "2024-03-09T08:30:00+01:00",
            "current_miles": 10_250.0,
            "previous_miles": 10_000.0,
            "price_per_gallon": 4.0,
            "gallons": 10.0,
            "total_cost": 40.0,
            "is_partial_fill_up": false,
            "notes": "corrected receipt",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["miles_driven"], 250.0);

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/records/{record_id}"),
        Some(json!({ "vehicle_id": vehicle_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &router,
        "GET",
        "/stats",
        Some(json!({ "vehicle_id": vehicle_id })),
    )
    .await;
    assert_eq!(parse(&body)["fill_up_count"], 0);
}

#[tokio::test]
async fn export_and_import_between_vehicles() {
    let router = test_router().await;
    let source = create_vehicle(&router, "Civic").await;
    let target = create_vehicle(&router, "Accord").await;
    send(
        &router,
        "POST",
        "/fillUp",
        Some(fill_up(&source, 10_300.0, Some(10_000.0))),
    )
    .await;

    let (status, body) = send(
        &router,
        "GET",
        "/export",
        Some(json!({ "vehicle_id": source })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = String::from_utf8(body).unwrap();
    assert!(data.starts_with(
        "date,currentMiles,previousMiles,pricePerGallon,gallons,totalCost,isPartialFillUp,notes"
    ));

    let (status, body) = send(
        &router,
        "POST",
        "/import",
        Some(json!({ "vehicle_id": target, "data": data })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["imported"], 1);

    let (_, body) = send(
        &router,
        "GET",
        "/stats",
        Some(json!({ "vehicle_id": target })),
    )
    .await;
    assert_eq!(parse(&body)["fill_up_count"], 1);
}
