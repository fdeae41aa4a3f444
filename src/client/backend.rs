//! HTTP client for the proxy backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::panel::PanelSource;
use crate::models::{ForecastSnapshot, WeatherSnapshot};

/// Failure of a single panel fetch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("location not found")]
    NotFound,

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Short reason shown next to "unavailable" in the display
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            FetchError::NotFound => "location not found".to_string(),
            FetchError::Backend { status: 504, .. } | FetchError::Timeout => {
                "weather service timed out".to_string()
            }
            FetchError::Backend { .. } | FetchError::Transport(_) => {
                "weather service unavailable".to_string()
            }
            FetchError::Decode(_) => "unexpected data from weather service".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
}

/// Client for the proxy's `/weather` and `/forecast` endpoints
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn current_weather(&self, location: &str) -> Result<WeatherSnapshot, FetchError> {
        self.get("weather", location).await
    }

    pub async fn forecast(&self, location: &str) -> Result<ForecastSnapshot, FetchError> {
        self.get("forecast", location).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, location: &str) -> Result<T, FetchError> {
        let Some(segment) = path_segment(location) else {
            debug!("Location {:?} cannot name a place, not requesting it", location);
            return Err(FetchError::NotFound);
        };
        let url = format!("{}/{}/{}", self.base_url, endpoint, segment);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .json::<BackendErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_default();
            return Err(FetchError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Source for a current-weather panel
    #[must_use]
    pub fn current_source(&self) -> CurrentWeatherSource {
        CurrentWeatherSource(self.clone())
    }

    /// Source for a forecast panel
    #[must_use]
    pub fn forecast_source(&self) -> ForecastSource {
        ForecastSource(self.clone())
    }
}

/// Percent-encoded path segment for a location.
///
/// Blank and dot-only locations have none: URL parsing folds `.` and `..`
/// segments (encoded or not) into the parent path.
fn path_segment(location: &str) -> Option<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return None;
    }
    Some(urlencoding::encode(location).into_owned())
}

#[derive(Debug, Clone)]
pub struct CurrentWeatherSource(BackendClient);

#[derive(Debug, Clone)]
pub struct ForecastSource(BackendClient);

#[async_trait]
impl PanelSource for CurrentWeatherSource {
    type Snapshot = WeatherSnapshot;

    async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, FetchError> {
        self.0.current_weather(location).await
    }
}

#[async_trait]
impl PanelSource for ForecastSource {
    type Snapshot = ForecastSnapshot;

    async fn fetch(&self, location: &str) -> Result<ForecastSnapshot, FetchError> {
        self.0.forecast(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(format!("{}/", server.uri()), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_current_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 12.3},
                "weather": [{"description": "light rain"}],
                "name": "Paris"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let snapshot = client.current_weather("Paris").await.unwrap();

        assert_eq!(snapshot.main.and_then(|m| m.temp), Some(12.3));
        assert_eq!(client.base_url(), mock_server.uri());
    }

    #[tokio::test]
    async fn test_location_is_percent_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/New%20York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cod": "200",
                "list": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let forecast = client.forecast("New York").await.unwrap();
        assert!(forecast.list.is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/Zzzqx123"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "location_not_found",
                "message": "No weather data found for 'Zzzqx123'."
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .current_weather("Zzzqx123")
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::NotFound);
    }

    #[tokio::test]
    async fn test_gateway_error_keeps_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/Paris"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "error": "upstream_unavailable",
                "message": "Unable to reach the weather service. Please try again later."
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .current_weather("Paris")
            .await
            .unwrap_err();
        match err {
            FetchError::Backend { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("Unable to reach"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .current_weather("Paris")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(".")]
    #[case("..")]
    #[case("...")]
    #[tokio::test]
    async fn test_unnameable_location_is_not_requested(#[case] location: &str) {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert_eq!(client.current_weather(location).await.unwrap_err(), FetchError::NotFound);
        assert_eq!(client.forecast(location).await.unwrap_err(), FetchError::NotFound);
    }

    #[rstest]
    #[case("St. Louis", Some("St.%20Louis"))]
    #[case("a.b", Some("a.b"))]
    #[case("..", None)]
    #[case(" ", None)]
    fn test_path_segment(#[case] location: &str, #[case] expected: Option<&str>) {
        assert_eq!(path_segment(location).as_deref(), expected);
    }

    #[rstest]
    #[case(FetchError::NotFound, "location not found")]
    #[case(FetchError::Timeout, "weather service timed out")]
    #[case(FetchError::Backend { status: 504, message: String::new() }, "weather service timed out")]
    #[case(FetchError::Backend { status: 502, message: String::new() }, "weather service unavailable")]
    #[case(FetchError::Transport("refused".into()), "weather service unavailable")]
    #[case(FetchError::Decode("eof".into()), "unexpected data from weather service")]
    fn test_reasons(#[case] err: FetchError, #[case] expected: &str) {
        assert_eq!(err.reason(), expected);
    }
}
