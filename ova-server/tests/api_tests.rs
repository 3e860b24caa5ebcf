//! Integration tests for the ova-server HTTP API
//!
//! Uses tower::ServiceExt::oneshot to test routes directly without binding a port.

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::Request;
use ova_server::{api::create_router, state::AppState};
use tower::ServiceExt;

/// Helper: build a router with fresh AppState
fn app() -> axum::Router {
    let state = AppState::new().expect("initial model fit");
    create_router(state)
}

/// Helper: build a router with AppState returned for further manipulation
fn app_with_state() -> (axum::Router, AppState) {
    let state = AppState::new().expect("initial model fit");
    let router = create_router(state.clone());
    (router, state)
}

/// Helper: collect response body into string
async fn body_string(body: Body) -> String {
    let collected = body.collect().await.unwrap();
    String::from_utf8(collected.to_bytes().to_vec()).unwrap()
}

async fn get_json(app: axum::Router, uri: &str) -> (u16, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let body = body_string(response.into_body()).await;
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    (status, parsed)
}

// ==================== GET /api/system-status ====================

#[tokio::test]
async fn test_system_status_reports_synthetic_source() {
    let (status, body) = get_json(app(), "/api/system-status").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["obd_connected"], false);
    assert_eq!(body["data"]["models_ready"], true);
    assert_eq!(body["data"]["vehicle_configured"], false);
}

// ==================== GET /api/vehicle-stats ====================

#[tokio::test]
async fn test_vehicle_stats_returns_full_derived_set() {
    let (status, body) = get_json(app(), "/api/vehicle-stats").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["degraded"], false);
    for field in [
        "engine_temp",
        "oil_temp",
        "rpm",
        "speed",
        "throttle_pos",
        "fuel_level",
        "timing_advance",
        "maf",
        "o2_voltage",
        "anomaly_score",
        "fuel_efficiency",
        "engine_health",
        "performance_score",
        "efficiency_score",
    ] {
        assert!(data[field].is_number(), "missing numeric field {}", field);
    }
    assert!(data["driving_pattern"].is_string());

    let health = data["engine_health"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&health));
}

// ==================== GET /api/maintenance-prediction ====================

#[tokio::test]
async fn test_maintenance_prediction_shape() {
    let (status, body) = get_json(app(), "/api/maintenance-prediction").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert!(data["maintenance_score"].is_number());
    let days = data["next_service_days"].as_u64().unwrap();
    assert!(days < 90);
    assert!(data["critical_components"].is_array());
    assert_eq!(data["estimated_costs"].as_object().unwrap().len(), 5);
    assert!(data["estimated_costs"]["oil_change"].is_number());
}

// ==================== GET /api/market-analysis ====================

#[tokio::test]
async fn test_market_analysis_defaults_and_memoization() {
    let (router, _state) = app_with_state();

    let (status, first) = get_json(router.clone(), "/api/market-analysis").await;
    assert_eq!(status, 200);
    assert_eq!(first["success"], true);
    assert!(first["data"]["current_value"].is_number());
    assert!(first["data"]["similar_listings"].is_number());
    assert!(first["data"]["market_trend"].is_string());

    // Same default key, same cached valuation.
    let (_, second) = get_json(router, "/api/market-analysis").await;
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_market_analysis_with_explicit_query() {
    let (status, body) = get_json(
        app(),
        "/api/market-analysis?make=Honda&model=Civic&year=2015",
    )
    .await;

    assert_eq!(status, 200);
    let value = body["data"]["current_value"].as_f64().unwrap();
    assert!(value > 0.0);
}

// ==================== GET /api/critical-alerts ====================

#[tokio::test]
async fn test_critical_alerts_count_matches_list() {
    let (status, body) = get_json(app(), "/api/critical-alerts").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let alerts = body["data"]["alerts"].as_array().unwrap();
    assert_eq!(
        body["data"]["total_alerts"].as_u64().unwrap() as usize,
        alerts.len()
    );
}

// ==================== GET /api/maintenance-costs ====================

#[tokio::test]
async fn test_maintenance_costs_lists_all_services() {
    let (status, body) = get_json(app(), "/api/maintenance-costs").await;

    assert_eq!(status, 200);
    let costs = body["data"]["estimated_costs"].as_object().unwrap();
    for service in [
        "oil_change",
        "air_filter",
        "brake_pads",
        "timing_belt",
        "spark_plugs",
    ] {
        assert!(costs.contains_key(service), "missing {}", service);
    }
}

// ==================== GET /api/historical-trends ====================

#[tokio::test]
async fn test_historical_trends_404_before_any_sample() {
    let (status, body) = get_json(app(), "/api/historical-trends").await;

    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_historical_trends_after_sampling() {
    let (router, _state) = app_with_state();

    // One stats call populates the history.
    let (status, _) = get_json(router.clone(), "/api/vehicle-stats").await;
    assert_eq!(status, 200);

    let (status, body) = get_json(router, "/api/historical-trends").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["data"]["avg_efficiency"].is_number());
    assert!(body["data"]["avg_health"].is_number());
    assert!(body["data"]["efficiency_trend"]["direction"].is_string());
    assert!(body["data"]["driving_patterns"].is_object());
}

// ==================== GET /api/driving-analytics ====================

#[tokio::test]
async fn test_driving_analytics_reports_known_pattern() {
    let (status, body) = get_json(app(), "/api/driving-analytics").await;

    assert_eq!(status, 200);
    let pattern = body["data"]["driving_pattern"].as_str().unwrap();
    assert!(["economic", "normal", "aggressive"].contains(&pattern));
    assert!(body["data"]["performance_score"].is_number());
    assert!(body["data"]["efficiency_score"].is_number());
}

// ==================== GET /api/price-estimate ====================

#[tokio::test]
async fn test_price_estimate_orders_by_age() {
    let (router, _state) = app_with_state();

    let (status, newer) = get_json(
        router.clone(),
        "/api/price-estimate?year=2022&mileage=24000&condition=86",
    )
    .await;
    assert_eq!(status, 200);

    let (_, older) = get_json(
        router,
        "/api/price-estimate?year=2011&mileage=156000&condition=64",
    )
    .await;

    let newer_price = newer["data"]["estimated_price"].as_f64().unwrap();
    let older_price = older["data"]["estimated_price"].as_f64().unwrap();
    assert!(newer_price > older_price);
}

#[tokio::test]
async fn test_price_estimate_requires_query_params() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/price-estimate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

// ==================== POST /api/set-vehicle-config ====================

#[tokio::test]
async fn test_set_vehicle_config_updates_status() {
    let (router, _state) = app_with_state();

    let body = serde_json::json!({
        "make": "Toyota",
        "model": "Camry",
        "year": 2020,
        "engine_type": "hybrid",
        "transmission": "cvt"
    });
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/set-vehicle-config")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = body_string(response.into_body()).await;
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["success"], true);

    let (_, status_body) = get_json(router, "/api/system-status").await;
    assert_eq!(status_body["data"]["vehicle_configured"], true);
}

#[tokio::test]
async fn test_set_vehicle_config_defaults_optional_fields() {
    // engine_type and transmission fall back to gasoline/automatic.
    let body = serde_json::json!({
        "make": "Ford",
        "model": "Focus",
        "year": 2018
    });
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/set-vehicle-config")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_set_vehicle_config_rejects_malformed_body() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/set-vehicle-config")
                .header("content-type", "application/json")
                .body(Body::from("{\"make\": \"Toyota\""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// ==================== GET /api/telemetry/stream ====================

#[tokio::test]
async fn test_telemetry_stream_negotiates_sse() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/telemetry/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/event-stream"));
}

#[tokio::test]
async fn test_stream_receives_sampled_readings() {
    let (_router, state) = app_with_state();
    let mut rx = state.subscribe();

    // Drive one sample through the engine directly, as the sampler would.
    {
        let mut engine = state.engine.write().await;
        let outcome = engine.get_real_time_data();
        state.telemetry_tx.send(outcome.into_reading()).unwrap();
    }

    let reading = rx.recv().await.unwrap();
    assert!(reading.engine_health.is_finite());
}
