//! Integration tests for the irrigation prediction endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn predict_without_weights_reports_model_unavailable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/irrigation/predict",
        json!({
            "humidity": 25.0,
            "ph": 6.2,
            "phosphorus": 14.0,
            "potassium": 9.0,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MODEL_UNAVAILABLE");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("irrigation-predictor"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_range_features_are_rejected_before_the_model(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/irrigation/predict",
        json!({
            "humidity": 180.0,
            "ph": 6.2,
            "phosphorus": 14.0,
            "potassium": 9.0,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("humidity"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_feature_fields_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/irrigation/predict",
        json!({ "humidity": 40.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
