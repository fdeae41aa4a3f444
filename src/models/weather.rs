//! Current-weather snapshot model
//!
//! Mirrors the provider's current-weather document. Everything the provider
//! may leave out is optional so a partial document still deserializes and the
//! display can fall back to placeholders.

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Current weather for one location, optionally enriched with air pollution
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainMeasurements>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
    /// Resolved location name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Observation time (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<i64>,
    #[serde(
        default,
        deserialize_with = "super::lenient_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub cod: Option<u16>,
    /// Embedded by the proxy from the air-pollution lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_pollution: Option<AirPollution>,
}

/// Main measurements block (`main`)
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MainMeasurements {
    /// Temperature in the requested units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    /// Atmospheric pressure in hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Relative humidity in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

/// One weather condition descriptor (`weather[]`)
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Wind block (`wind`)
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Wind {
    /// Wind speed in m/s (metric units)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Wind direction in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

/// Air-pollution document, as returned by the provider's pollution lookup
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AirPollution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coordinates>,
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AirPollutionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<AirQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<PollutantComponents>,
}

/// Air quality index, 1 (good) to 5 (very poor)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct AirQuality {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<u8>,
}

/// Pollutant concentrations in µg/m³
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PollutantComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm2_5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nh3: Option<f64>,
}

impl PollutantComponents {
    /// Present concentrations as `(name, value)`, in provider order
    #[must_use]
    pub fn readings(&self) -> Vec<(&'static str, f64)> {
        [
            ("co", self.co),
            ("no", self.no),
            ("no2", self.no2),
            ("o3", self.o3),
            ("so2", self.so2),
            ("pm2_5", self.pm2_5),
            ("pm10", self.pm10),
            ("nh3", self.nh3),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

impl WeatherSnapshot {
    /// First weather descriptor, which the provider lists as the primary one
    #[must_use]
    pub fn condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.condition().and_then(|c| c.description.as_deref())
    }

    /// First air-pollution reading, if the lookup was embedded
    #[must_use]
    pub fn air_reading(&self) -> Option<&AirPollutionEntry> {
        self.air_pollution.as_ref().and_then(|a| a.list.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "base": "stations",
        "main": {"temp": 12.3, "feels_like": 11.1, "temp_min": 10.9, "temp_max": 13.6, "pressure": 1012, "humidity": 81},
        "visibility": 10000,
        "wind": {"speed": 4.12, "deg": 230},
        "dt": 1700000000,
        "name": "Paris",
        "cod": 200
    }"#;

    #[test]
    fn test_deserialize_provider_document() {
        let snapshot: WeatherSnapshot = serde_json::from_str(PARIS).unwrap();
        let main = snapshot.main.as_ref().unwrap();

        assert_eq!(main.temp, Some(12.3));
        assert_eq!(main.humidity, Some(81.0));
        assert_eq!(snapshot.description(), Some("light rain"));
        assert_eq!(snapshot.wind.as_ref().and_then(|w| w.speed), Some(4.12));
        assert_eq!(snapshot.cod, Some(200));
        assert!(snapshot.air_pollution.is_none());
        assert!(snapshot.air_reading().is_none());
    }

    #[test]
    fn test_cod_as_string() {
        let snapshot: WeatherSnapshot = serde_json::from_str(r#"{"cod": "200"}"#).unwrap();
        assert_eq!(snapshot.cod, Some(200));
    }

    #[test]
    fn test_empty_document_is_accepted() {
        let snapshot: WeatherSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.main.is_none());
        assert!(snapshot.condition().is_none());
        assert!(snapshot.dt.is_none());
    }

    #[test]
    fn test_air_reading_uses_first_entry() {
        let mut snapshot: WeatherSnapshot = serde_json::from_str(PARIS).unwrap();
        snapshot.air_pollution = Some(AirPollution {
            coord: None,
            list: vec![AirPollutionEntry {
                dt: None,
                main: Some(AirQuality { aqi: Some(2) }),
                components: Some(PollutantComponents {
                    co: Some(201.94),
                    ..PollutantComponents::default()
                }),
            }],
        });

        let reading = snapshot.air_reading().unwrap();
        assert_eq!(reading.main.and_then(|m| m.aqi), Some(2));
        assert_eq!(reading.components.as_ref().and_then(|c| c.co), Some(201.94));
    }

    #[test]
    fn test_component_readings_skip_missing() {
        let components = PollutantComponents {
            co: Some(230.31),
            o3: Some(60.1),
            pm10: Some(6.1),
            ..PollutantComponents::default()
        };
        assert_eq!(
            components.readings(),
            vec![("co", 230.31), ("o3", 60.1), ("pm10", 6.1)]
        );
        assert!(PollutantComponents::default().readings().is_empty());
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let snapshot = WeatherSnapshot {
            name: Some("Paris".to_string()),
            ..WeatherSnapshot::default()
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Paris", "weather": []}));
    }
}
