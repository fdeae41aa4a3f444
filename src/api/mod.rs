use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    ProxyError, VERSION,
    models::{ForecastSnapshot, WeatherSnapshot},
    provider::WeatherProvider,
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub upstream_calls: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/{location}", get(get_current_weather))
        .route("/forecast/{location}", get(get_forecast))
        .route("/health", get(get_health))
        .route("/stats", get(get_stats))
        .with_state(state)
}

#[instrument(skip(state))]
async fn get_current_weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<WeatherSnapshot>, ProxyError> {
    let snapshot = state.provider.current_weather(&location).await?;
    Ok(Json(snapshot))
}

#[instrument(skip(state))]
async fn get_forecast(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ForecastSnapshot>, ProxyError> {
    let forecast = state.provider.forecast(&location).await?;
    Ok(Json(forecast))
}

async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        upstream_calls: state.provider.upstream_calls(),
    })
}
