//! Forecast snapshot model
//!
//! The provider's forecast is a sequence of three-hour buckets. The whole
//! sequence is kept; the display reads the nearest bucket as its headline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{City, MainMeasurements, WeatherCondition, Wind};

/// Forecast for one location
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ForecastSnapshot {
    #[serde(
        default,
        deserialize_with = "super::lenient_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub cod: Option<u16>,
    /// Number of entries reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnt: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    /// Time buckets, sorted by timestamp
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// One forecast time bucket
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ForecastEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<i64>,
    /// Provider-formatted bucket time, e.g. `2024-05-01 12:00:00`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_txt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainMeasurements>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
}

impl ForecastSnapshot {
    /// Nearest time bucket
    #[must_use]
    pub fn first(&self) -> Option<&ForecastEntry> {
        self.list.first()
    }

    /// Buckets after the headline one
    pub fn upcoming(&self) -> impl Iterator<Item = &ForecastEntry> {
        self.list.iter().skip(1)
    }
}

impl ForecastEntry {
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.weather.first().and_then(|c| c.description.as_deref())
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.dt.and_then(|dt| DateTime::from_timestamp(dt, 0))
    }

    /// Bucket label, preferring the provider's text and falling back to `dt`
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.dt_txt.clone().or_else(|| {
            self.timestamp()
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST: &str = r#"{
        "cod": "200",
        "message": 0,
        "cnt": 2,
        "list": [
            {
                "dt": 1700006400,
                "main": {"temp": 9.5, "feels_like": 7.2, "temp_min": 9.1, "temp_max": 9.5, "pressure": 1015, "humidity": 77},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01n"}],
                "wind": {"speed": 3.1, "deg": 210},
                "dt_txt": "2023-11-15 00:00:00"
            },
            {
                "dt": 1700017200,
                "main": {"temp": 8.4},
                "weather": [{"description": "light rain"}],
                "wind": {"speed": 2.2}
            }
        ],
        "city": {"id": 2988507, "name": "Paris", "coord": {"lat": 48.8534, "lon": 2.3488}, "country": "FR"}
    }"#;

    #[test]
    fn test_deserialize_forecast() {
        let forecast: ForecastSnapshot = serde_json::from_str(FORECAST).unwrap();

        assert_eq!(forecast.cod, Some(200));
        assert_eq!(forecast.cnt, Some(2));
        assert_eq!(forecast.city.as_ref().and_then(|c| c.name.as_deref()), Some("Paris"));
        assert_eq!(forecast.list.len(), 2);

        let first = forecast.first().unwrap();
        assert_eq!(first.main.as_ref().and_then(|m| m.temp), Some(9.5));
        assert_eq!(first.description(), Some("clear sky"));
    }

    #[test]
    fn test_upcoming_skips_headline() {
        let forecast: ForecastSnapshot = serde_json::from_str(FORECAST).unwrap();
        let upcoming: Vec<_> = forecast.upcoming().collect();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].description(), Some("light rain"));
    }

    #[test]
    fn test_label_falls_back_to_timestamp() {
        let forecast: ForecastSnapshot = serde_json::from_str(FORECAST).unwrap();
        assert_eq!(forecast.list[0].label().as_deref(), Some("2023-11-15 00:00:00"));
        assert_eq!(forecast.list[1].label().as_deref(), Some("2023-11-15 03:00:00"));
    }

    #[test]
    fn test_empty_forecast() {
        let forecast: ForecastSnapshot = serde_json::from_str(r#"{"cod":"200","list":[]}"#).unwrap();
        assert!(forecast.first().is_none());
        assert_eq!(forecast.upcoming().count(), 0);
    }
}
