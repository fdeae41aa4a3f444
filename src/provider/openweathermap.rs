//! OpenWeatherMap client
//!
//! Fetches current weather, forecasts and air pollution. Current weather is
//! enriched with the air-pollution reading for the returned coordinates; a
//! failed pollution lookup only drops the enrichment.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::UpstreamConfig;
use crate::models::{AirPollution, Coordinates, ForecastSnapshot, WeatherSnapshot};
use crate::{ProxyError, Result};

const USER_AGENT: &str = concat!("weathercast/", env!("CARGO_PKG_VERSION"));

/// Error document the provider sends with non-success statuses
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

pub struct OpenWeatherMapClient {
    client: Client,
    config: UpstreamConfig,
    call_count: AtomicU64,
}

impl OpenWeatherMapClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProxyError::config(format!("Failed to create HTTP client: {e}")))?;

        if config.api_key.is_none() {
            warn!("No weather API key configured, provider calls will likely be rejected");
        }

        Ok(Self {
            client,
            config,
            call_count: AtomicU64::new(0),
        })
    }

    /// Air-pollution reading for a coordinate pair
    #[instrument(skip(self))]
    pub async fn air_pollution(&self, coord: Coordinates) -> Result<AirPollution> {
        let params = vec![("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())];
        self.get_json(&self.config.air_pollution_url, params, None)
            .await
    }

    fn location_params(&self, location: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", location.to_string()),
            ("units", self.config.units.clone()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        mut params: Vec<(&'static str, String)>,
        location: Option<&str>,
    ) -> Result<T> {
        if let Some(key) = &self.config.api_key {
            params.push(("appid", key.clone()));
        }

        let call = self.call_count.fetch_add(1, Ordering::Relaxed) + 1;
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ProxyError::from_transport(&e))?;

        let status = response.status();
        info!(
            "API call {}: status code {} in {:.3}s",
            call,
            status.as_u16(),
            start_time.elapsed().as_secs_f64()
        );

        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::from_transport(&e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| body.clone());

            return Err(match (status, location) {
                (StatusCode::NOT_FOUND, Some(location)) => ProxyError::not_found(location),
                _ => ProxyError::rejected(status.as_u16(), message),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!("Unparseable provider body: {}", body);
            ProxyError::malformed(e.to_string())
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, location: &str) -> Result<WeatherSnapshot> {
        let mut snapshot: WeatherSnapshot = self
            .get_json(
                &self.config.current_url,
                self.location_params(location),
                Some(location),
            )
            .await?;

        if self.config.include_air_pollution {
            match snapshot.coord {
                Some(coord) => {
                    let lookup = self.air_pollution(coord);
                    match tokio::time::timeout(self.config.air_pollution_timeout(), lookup).await {
                        Ok(Ok(pollution)) => snapshot.air_pollution = Some(pollution),
                        Ok(Err(e)) => warn!("Error fetching air pollution data: {}", e),
                        Err(_) => warn!(
                            "Air pollution lookup exceeded {} ms, returning weather without it",
                            self.config.air_pollution_timeout_ms
                        ),
                    }
                }
                None => debug!("No coordinates in weather response, skipping air pollution"),
            }
        }

        Ok(snapshot)
    }

    #[instrument(skip(self))]
    async fn forecast(&self, location: &str) -> Result<ForecastSnapshot> {
        let forecast: ForecastSnapshot = self
            .get_json(
                &self.config.forecast_url,
                self.location_params(location),
                Some(location),
            )
            .await?;

        debug!("Forecast for {} has {} entries", location, forecast.list.len());
        Ok(forecast)
    }

    fn upstream_calls(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}
