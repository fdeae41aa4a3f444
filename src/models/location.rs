//! Location model for geographic coordinates and city metadata

use serde::{Deserialize, Serialize};

/// Provider coordinates, as returned under `coord`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

/// City block of a forecast document
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct City {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord: Option<Coordinates>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_from_provider_order() {
        let coord: Coordinates = serde_json::from_str(r#"{"lon": 2.3488, "lat": 48.8534}"#).unwrap();
        assert_eq!(coord.lat, 48.8534);
        assert_eq!(coord.lon, 2.3488);
    }

    #[test]
    fn test_city_tolerates_missing_fields() {
        let city: City = serde_json::from_str(r#"{"name":"Paris"}"#).unwrap();
        assert_eq!(city.name.as_deref(), Some("Paris"));
        assert!(city.country.is_none());
        assert!(city.coord.is_none());
    }
}
