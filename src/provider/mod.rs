//! Weather provider integration
//!
//! The proxy talks to the external weather service through the
//! [`WeatherProvider`] trait so handlers can be exercised against a fake.

use async_trait::async_trait;

use crate::Result;
use crate::models::{ForecastSnapshot, WeatherSnapshot};

pub mod openweathermap;

pub use openweathermap::OpenWeatherMapClient;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a free-text location
    async fn current_weather(&self, location: &str) -> Result<WeatherSnapshot>;

    /// Time-bucketed forecast for a free-text location
    async fn forecast(&self, location: &str) -> Result<ForecastSnapshot>;

    /// Number of outbound calls made so far
    fn upstream_calls(&self) -> u64;
}
