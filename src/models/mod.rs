//! Data models for the weather proxy
//!
//! This module contains the typed provider documents organized by concern:
//! - Location: Coordinates and city metadata
//! - Weather: Current-weather snapshot with optional air pollution
//! - Forecast: Time-bucketed forecast snapshot

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{ForecastEntry, ForecastSnapshot};
pub use location::{City, Coordinates};
pub use weather::{
    AirPollution, AirPollutionEntry, AirQuality, MainMeasurements, PollutantComponents,
    WeatherCondition, WeatherSnapshot, Wind,
};

use serde::{Deserialize, Deserializer};

/// The provider reports `cod` as a number on current weather and as a string
/// on forecasts and errors.
pub(crate) fn lenient_code<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(u16),
        Text(String),
    }

    Ok(match Option::<Code>::deserialize(deserializer)? {
        Some(Code::Number(n)) => Some(n),
        Some(Code::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
