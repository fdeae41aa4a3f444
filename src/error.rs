//! Error types and handling for the weather proxy

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the backend proxy
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The provider does not know the requested location
    #[error("Location not found: {location}")]
    LocationNotFound { location: String },

    /// The provider could not be reached
    #[error("Weather provider unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// The provider did not answer within the configured timeout
    #[error("Weather provider timed out: {message}")]
    UpstreamTimeout { message: String },

    /// The provider answered with a body that does not match the schema
    #[error("Malformed response from weather provider: {message}")]
    MalformedUpstreamResponse { message: String },

    /// The provider answered with a non-success status other than 404
    #[error("Weather provider rejected the request ({status}): {message}")]
    UpstreamRejected { status: u16, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// JSON body returned to callers for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ProxyError {
    pub fn not_found<S: Into<String>>(location: S) -> Self {
        Self::LocationNotFound {
            location: location.into(),
        }
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::UpstreamTimeout {
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedUpstreamResponse {
            message: message.into(),
        }
    }

    pub fn rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self::UpstreamRejected {
            status,
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify a transport-level reqwest failure
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_decode() {
            Self::malformed(err.to_string())
        } else {
            Self::unavailable(err.to_string())
        }
    }

    /// Stable machine-readable code used in error bodies
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::LocationNotFound { .. } => "location_not_found",
            ProxyError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ProxyError::UpstreamTimeout { .. } => "upstream_timeout",
            ProxyError::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
            ProxyError::UpstreamRejected { .. } => "upstream_rejected",
            ProxyError::Config { .. } => "config",
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamUnavailable { .. }
            | ProxyError::MalformedUpstreamResponse { .. }
            | ProxyError::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ProxyError::LocationNotFound { location } => {
                format!("No weather data found for '{location}'.")
            }
            ProxyError::UpstreamUnavailable { .. } | ProxyError::UpstreamRejected { .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            ProxyError::UpstreamTimeout { .. } => {
                "The weather service is taking too long to respond.".to_string()
            }
            ProxyError::MalformedUpstreamResponse { .. } => {
                "The weather service returned data in an unexpected format.".to_string()
            }
            ProxyError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::info!(code = self.code(), "{}", self);
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ProxyError::not_found("Zzzqx123"), StatusCode::NOT_FOUND)]
    #[case(ProxyError::unavailable("connection refused"), StatusCode::BAD_GATEWAY)]
    #[case(ProxyError::timeout("deadline"), StatusCode::GATEWAY_TIMEOUT)]
    #[case(ProxyError::malformed("missing field `main`"), StatusCode::BAD_GATEWAY)]
    #[case(ProxyError::rejected(401, "invalid api key"), StatusCode::BAD_GATEWAY)]
    fn test_status_mapping(#[case] err: ProxyError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn test_user_messages() {
        let err = ProxyError::not_found("Atlantis");
        assert!(err.user_message().contains("Atlantis"));

        let err = ProxyError::unavailable("dns failure");
        assert!(err.user_message().contains("Unable to reach"));

        let err = ProxyError::config("bad");
        assert!(err.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_codes_are_snake_case() {
        assert_eq!(ProxyError::not_found("x").code(), "location_not_found");
        assert_eq!(ProxyError::timeout("x").code(), "upstream_timeout");
        assert_eq!(ProxyError::rejected(429, "x").code(), "upstream_rejected");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ProxyError::not_found("Zzzqx123").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "location_not_found");
        assert!(body["message"].as_str().unwrap().contains("Zzzqx123"));
    }
}
