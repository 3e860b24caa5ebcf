//! REST API and SSE routes
//!
//! Every handler is thin glue over the engine: acquire the lock, call one
//! engine operation, wrap the result in the `{"success": ..}` envelope.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures::stream::{Stream, StreamExt as FuturesStreamExt};
use ova_core::profile::VehicleConfig;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/system-status", get(system_status))
        .route("/api/vehicle-stats", get(vehicle_stats))
        .route("/api/maintenance-prediction", get(maintenance_prediction))
        .route("/api/market-analysis", get(market_analysis))
        .route("/api/critical-alerts", get(critical_alerts))
        .route("/api/maintenance-costs", get(maintenance_costs))
        .route("/api/historical-trends", get(historical_trends))
        .route("/api/driving-analytics", get(driving_analytics))
        .route("/api/price-estimate", get(price_estimate))
        .route("/api/set-vehicle-config", post(set_vehicle_config))
        .route("/api/telemetry/stream", get(telemetry_stream))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn ok(data: serde_json::Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

// === Status ===

async fn system_status(State(state): State<AppState>) -> Response {
    let engine = state.engine.read().await;
    ok(json!({
        "obd_connected": engine.is_obd_connected(),
        "source": engine.source_name(),
        "models_ready": true,
        "vehicle_configured": engine.profile().is_some(),
        "last_update": Utc::now(),
    }))
}

// === Live telemetry ===

async fn vehicle_stats(State(state): State<AppState>) -> Response {
    let mut engine = state.engine.write().await;
    let outcome = engine.get_real_time_data();
    let degraded = outcome.is_degraded();

    match serde_json::to_value(outcome.reading()) {
        Ok(mut data) => {
            data["degraded"] = json!(degraded);
            ok(data)
        }
        Err(e) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to serialize reading: {}", e),
        ),
    }
}

async fn driving_analytics(State(state): State<AppState>) -> Response {
    let mut engine = state.engine.write().await;
    let reading = engine.get_real_time_data().into_reading();

    ok(json!({
        "driving_pattern": reading.driving_pattern,
        "performance_score": reading.performance_score,
        "efficiency_score": reading.efficiency_score,
        "fuel_efficiency": reading.fuel_efficiency,
    }))
}

// === Maintenance ===

async fn maintenance_prediction(State(state): State<AppState>) -> Response {
    let mut engine = state.engine.write().await;
    let prediction = engine.predict_maintenance();

    match serde_json::to_value(&prediction) {
        Ok(data) => ok(data),
        Err(e) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to serialize prediction: {}", e),
        ),
    }
}

async fn critical_alerts(State(state): State<AppState>) -> Response {
    let mut engine = state.engine.write().await;
    let reading = engine.get_real_time_data().into_reading();
    let alerts = engine.identify_critical_components(&reading.raw);
    let total = alerts.len();

    ok(json!({
        "alerts": alerts,
        "total_alerts": total,
    }))
}

async fn maintenance_costs(State(state): State<AppState>) -> Response {
    let mut engine = state.engine.write().await;
    let reading = engine.get_real_time_data().into_reading();
    let costs = engine.estimate_maintenance_costs(&reading.raw);

    ok(json!({
        "estimated_costs": costs,
        "engine_health": reading.engine_health,
    }))
}

// === Market ===

#[derive(Deserialize)]
struct MarketQuery {
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
}

async fn market_analysis(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> Response {
    let make = query.make.as_deref().unwrap_or("Toyota");
    let model = query.model.as_deref().unwrap_or("Camry");
    let year = query.year.unwrap_or(2020);

    let mut engine = state.engine.write().await;
    let data = engine.get_market_data(make, model, year);

    match serde_json::to_value(&data) {
        Ok(data) => ok(data),
        Err(e) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to serialize market data: {}", e),
        ),
    }
}

#[derive(Deserialize)]
struct PriceQuery {
    year: i32,
    mileage: f64,
    condition: f64,
}

async fn price_estimate(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Response {
    let engine = state.engine.read().await;
    let estimate = engine.estimate_price(query.year, query.mileage, query.condition);

    ok(json!({
        "year": query.year,
        "mileage": query.mileage,
        "condition": query.condition,
        "estimated_price": estimate,
    }))
}

// === History ===

async fn historical_trends(State(state): State<AppState>) -> Response {
    let engine = state.engine.read().await;
    match engine.get_historical_analysis() {
        Some(analysis) => match serde_json::to_value(&analysis) {
            Ok(data) => ok(data),
            Err(e) => error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to serialize trends: {}", e),
            ),
        },
        None => error(StatusCode::NOT_FOUND, "No historical data available"),
    }
}

// === Configuration ===

async fn set_vehicle_config(
    State(state): State<AppState>,
    Json(config): Json<VehicleConfig>,
) -> Response {
    let mut engine = state.engine.write().await;
    match engine.set_vehicle_config(config) {
        Ok(()) => ok(json!({ "message": "Vehicle configuration updated" })),
        Err(e) => {
            tracing::error!("vehicle config rejected: {}", e);
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to apply configuration: {}", e),
            )
        }
    }
}

// === Telemetry Stream ===

async fn telemetry_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(reading) => match serde_json::to_string(&reading) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    tracing::error!("Failed to serialize reading: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Broadcast stream error: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
