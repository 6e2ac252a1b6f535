//! Integration tests for the farm structure browse endpoints and the
//! dashboard aggregates, against the seeded reference data.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_producers_returns_seeded_rows(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/producers").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let producers = json["data"].as_array().unwrap();
    assert_eq!(producers.len(), 2);
    assert_eq!(producers[0]["name"], "Fazenda Santa Clara");
    assert!(producers[0]["email"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_producer_by_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/producers/2").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], 2);
    assert_eq!(json["data"]["name"], "Sitio Boa Vista");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_unknown_producer_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/producers/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("Producer"));
}

// ---------------------------------------------------------------------------
// Crops and sensors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_crops_returns_seeded_rows(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/crops").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let crops = json["data"].as_array().unwrap();
    assert_eq!(crops.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_sensors_returns_catalog(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/sensors").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let sensors = json["data"].as_array().unwrap();
    assert_eq!(sensors.len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn installed_sensors_carry_join_context(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/sensors/installed").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let installed = json["data"].as_array().unwrap();
    assert_eq!(installed.len(), 3);

    // Every row resolves its sensor, crop, and producer names.
    for row in installed {
        assert!(row["sensor_model"].is_string());
        assert!(row["crop_name"].is_string());
        assert!(row["producer_name"].is_string());
    }
}

// ---------------------------------------------------------------------------
// Dashboard overview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_overview_counts_seeded_entities(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/dashboard/overview").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["producers"], 2);
    assert_eq!(data["crops"], 2);
    assert_eq!(data["sensors"], 3);
    assert_eq!(data["installed_sensors"], 3);
    assert_eq!(data["readings"], 0);
    assert_eq!(data["vision_sessions"], 0);

    // No weight files in the test environment: listed, none available.
    let models = data["models"].as_array().unwrap();
    assert_eq!(models.len(), 4);
    assert!(models.iter().all(|m| m["available"] == false));

    // Default thresholds are reported as configured.
    assert_eq!(data["thresholds"]["humidity_min"], 30.0);
    assert_eq!(data["thresholds"]["ph_min"], 6.0);
    assert_eq!(data["thresholds"]["ph_max"], 7.5);
}
