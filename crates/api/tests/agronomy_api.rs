//! Integration tests for the planting plan endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// POST /api/v1/agronomy/plan
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn coffee_plan_computes_expected_figures(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/agronomy/plan",
        json!({
            "crop": "coffee",
            "diagonal_major_m": 100.0,
            "diagonal_minor_m": 80.0,
            "dose_per_m2": 0.5,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["crop"], "coffee");
    assert_eq!(data["area_m2"], 4000.0);
    assert_eq!(data["row_spacing_m"], 3.6);
    assert_eq!(data["row_count"], 28);

    let usable = data["usable_area_m2"].as_f64().unwrap();
    assert!((usable - 3899.2).abs() < 1e-9);

    assert_eq!(data["total_input"], 1950.0);
    assert_eq!(data["suggested_inputs"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sugarcane_plan_uses_tighter_row_spacing(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/agronomy/plan",
        json!({
            "crop": "sugarcane",
            "diagonal_major_m": 50.0,
            "diagonal_minor_m": 30.0,
            "dose_per_m2": 0.0,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["area_m2"], 750.0);
    assert_eq!(data["row_spacing_m"], 1.5);
    assert_eq!(data["row_count"], 33);
    assert_eq!(data["total_input"], 0.0);
    assert_eq!(data["suggested_inputs"][0], "Urea");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_positive_diagonal_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/agronomy/plan",
        json!({
            "crop": "coffee",
            "diagonal_major_m": -10.0,
            "diagonal_minor_m": 80.0,
            "dose_per_m2": 0.5,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("diagonals"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_crop_is_rejected_by_deserialization(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/agronomy/plan",
        json!({
            "crop": "banana",
            "diagonal_major_m": 10.0,
            "diagonal_minor_m": 10.0,
            "dose_per_m2": 0.1,
        }),
    )
    .await;

    // Serde rejects the enum value before the handler runs.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
