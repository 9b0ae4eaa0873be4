//! HTTP API for the valuation service.
//!
//! - `POST /predict` - value a vehicle
//! - `GET /api/trims/{make}/{model}` - trim names for the picker
//! - `GET /health` - liveness
//! - `GET /` - welcome message

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use carseer_market::Orchestrator;
use carseer_models::{ServerConfig, ValuationResult, VehicleQuery};
use carseer_pricing::PricingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// A valuation stamped with the time it was produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub valuation: ValuationResult,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrimsResponse {
    pub trims: Vec<String>,
}

/// Errors returned to API clients as 400 `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("{0}")]
    Pricing(#[from] PricingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Pricing(PricingError::InvalidRequest(reason)) => reason.clone(),
            ApiError::Pricing(e) => e.to_string(),
        };
        warn!(error = %self, "Rejected request");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response()
    }
}

pub fn router(orchestrator: Arc<Orchestrator>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/api/trims/{make}/{model}", get(list_trims))
        .layer(cors_layer(cors_origins))
        .with_state(orchestrator)
}

/// Allow the configured origins; `*` allows any.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serve the API until `cancel` fires.
pub async fn serve(
    orchestrator: Arc<Orchestrator>,
    config: &ServerConfig,
    cancel: CancellationToken,
) -> Result<(), anyhow::Error> {
    let app = router(orchestrator, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "CarSeer API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to CarSeer API" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn predict(
    State(orchestrator): State<Arc<Orchestrator>>,
    payload: Result<Json<VehicleQuery>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(query) = payload?;
    let valuation = orchestrator.predict(&query).await?;

    Ok(Json(PredictResponse {
        valuation,
        timestamp: Utc::now(),
    }))
}

async fn list_trims(
    State(orchestrator): State<Arc<Orchestrator>>,
    Path((make, model)): Path<(String, String)>,
) -> Json<TrimsResponse> {
    let trims = orchestrator.list_trims(&make, &model).await;
    Json(TrimsResponse { trims })
}
