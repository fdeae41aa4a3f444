//! Configuration management for the weather proxy and display client
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ProxyError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeathercastConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Display client configuration
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Provider API key, forwarded as `appid`
    pub api_key: Option<String>,
    #[serde(default = "default_current_url")]
    pub current_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_air_pollution_url")]
    pub air_pollution_url: String,
    /// Unit system requested from the provider (metric, imperial, standard)
    #[serde(default = "default_units")]
    pub units: String,
    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u32,
    /// Time allowed for the air-pollution lookup after current weather returned
    #[serde(default = "default_air_pollution_timeout_ms")]
    pub air_pollution_timeout_ms: u64,
    /// Embed the air-pollution lookup into current weather
    #[serde(default = "default_true")]
    pub include_air_pollution: bool,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional directory served for every path the API does not claim
    pub static_dir: Option<String>,
}

/// Display client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the proxy backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Location fetched when the panels start
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Quiet period before an edited location is fetched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_client_timeout")]
    pub request_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_current_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_forecast_url() -> String {
    "https://api.openweathermap.org/data/2.5/forecast".to_string()
}

fn default_air_pollution_url() -> String {
    "https://api.openweathermap.org/data/2.5/air_pollution".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_upstream_timeout() -> u32 {
    10
}

fn default_air_pollution_timeout_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_location() -> String {
    "Paris".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_client_timeout() -> u32 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            current_url: default_current_url(),
            forecast_url: default_forecast_url(),
            air_pollution_url: default_air_pollution_url(),
            units: default_units(),
            timeout_seconds: default_upstream_timeout(),
            air_pollution_timeout_ms: default_air_pollution_timeout_ms(),
            include_air_pollution: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            default_location: default_location(),
            debounce_ms: default_debounce_ms(),
            request_timeout_seconds: default_client_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WeathercastConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            server: ServerConfig::default(),
            client: ClientConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    #[must_use]
    pub fn air_pollution_timeout(&self) -> Duration {
        Duration::from_millis(self.air_pollution_timeout_ms)
    }

    /// Longest a current-weather request can take: the weather call plus
    /// the air-pollution lookup
    #[must_use]
    pub fn worst_case_latency(&self) -> Duration {
        if self.include_air_pollution {
            self.timeout() + self.air_pollution_timeout()
        } else {
            self.timeout()
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.into())
    }
}

impl WeathercastConfig {
    /// Load configuration from the given file, or the default location when
    /// none is given, layered under environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WEATHERCAST_UPSTREAM__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("WEATHERCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeathercastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathercast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.upstream.current_url.is_empty() {
            self.upstream.current_url = default_current_url();
        }
        if self.upstream.forecast_url.is_empty() {
            self.upstream.forecast_url = default_forecast_url();
        }
        if self.upstream.air_pollution_url.is_empty() {
            self.upstream.air_pollution_url = default_air_pollution_url();
        }
        if self.upstream.units.is_empty() {
            self.upstream.units = default_units();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_upstream_timeout();
        }
        if self.upstream.air_pollution_timeout_ms == 0 {
            self.upstream.air_pollution_timeout_ms = default_air_pollution_timeout_ms();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.client.backend_url.is_empty() {
            self.client.backend_url = default_backend_url();
        }
        if self.client.default_location.trim().is_empty() {
            self.client.default_location = default_location();
        }
        if self.client.debounce_ms == 0 {
            self.client.debounce_ms = default_debounce_ms();
        }
        if self.client.request_timeout_seconds == 0 {
            self.client.request_timeout_seconds = default_client_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the provider API key when one is set
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.upstream.api_key {
            if api_key.is_empty() {
                return Err(ProxyError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(ProxyError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 100 {
                return Err(ProxyError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.upstream.timeout_seconds > 300 {
            return Err(ProxyError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        if self.client.request_timeout_seconds > 300 {
            return Err(ProxyError::config("Client request timeout cannot exceed 300 seconds").into());
        }

        if self.upstream.air_pollution_timeout_ms > 60_000 {
            return Err(
                ProxyError::config("Air pollution timeout cannot exceed 60000 ms").into(),
            );
        }

        if self.client.request_timeout() <= self.upstream.worst_case_latency() {
            return Err(ProxyError::config(format!(
                "Client request timeout ({} s) must exceed the proxy's worst-case latency ({} ms)",
                self.client.request_timeout_seconds,
                self.upstream.worst_case_latency().as_millis()
            ))
            .into());
        }

        if self.client.debounce_ms > 10_000 {
            return Err(ProxyError::config("Debounce window cannot exceed 10000 ms").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ProxyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ProxyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_units = ["metric", "imperial", "standard"];
        if !valid_units.contains(&self.upstream.units.as_str()) {
            return Err(ProxyError::config(format!(
                "Invalid units '{}'. Must be one of: {}",
                self.upstream.units,
                valid_units.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Current weather URL", &self.upstream.current_url),
            ("Forecast URL", &self.upstream.forecast_url),
            ("Air pollution URL", &self.upstream.air_pollution_url),
            ("Backend URL", &self.client.backend_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(
                    ProxyError::config(format!("{name} must be a valid HTTP or HTTPS URL")).into(),
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WeathercastConfig::default();
        assert_eq!(
            config.upstream.current_url,
            "https://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert_eq!(config.upstream.units, "metric");
        assert_eq!(config.client.default_location, "Paris");
        assert_eq!(config.client.debounce(), Duration::from_millis(500));
        assert_eq!(config.logging.level, "info");
        assert!(config.upstream.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = WeathercastConfig::default();
        config.upstream.api_key = Some("abc".to_string());
        let result = config.validate_api_key();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = WeathercastConfig::default();
        config.upstream.api_key = Some("valid_api_key_123".to_string());
        assert!(config.validate_api_key().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeathercastConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeathercastConfig::default();
        config.upstream.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_client_timeout_must_cover_both_upstream_calls() {
        let mut config = WeathercastConfig::default();
        assert_eq!(
            config.upstream.worst_case_latency(),
            Duration::from_millis(13_000)
        );
        assert!(config.validate().is_ok());

        config.upstream.timeout_seconds = 12;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("worst-case latency"));

        config.upstream.include_air_pollution = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = WeathercastConfig::default();
        config.client.backend_url = "localhost:8080".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Backend URL"));
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = WeathercastConfig::default();
        config.upstream.timeout_seconds = 0;
        config.client.debounce_ms = 0;
        config.client.default_location = "   ".to_string();
        config.apply_defaults();
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert_eq!(config.client.debounce_ms, 500);
        assert_eq!(config.client.default_location, "Paris");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("weathercast-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[upstream]\napi_key = \"0123456789abcdef\"\ntimeout_seconds = 5\n\n[client]\ndefault_location = \"Lyon\"\n"
        )
        .unwrap();

        let config = WeathercastConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(config.upstream.api_key.as_deref(), Some("0123456789abcdef"));
        assert_eq!(config.upstream.timeout_seconds, 5);
        assert_eq!(config.client.default_location, "Lyon");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeathercastConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weathercast"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
