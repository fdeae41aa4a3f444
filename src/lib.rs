//! `Weathercast` - weather proxy and reactive display client
//!
//! The proxy forwards location lookups to a third-party weather provider and
//! normalizes its failures into a small set of error responses. The display
//! client keeps one current-weather panel and one forecast panel in sync with
//! debounced location inputs.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod web;

// Re-export core types for public API
pub use client::{BackendClient, Dashboard, FetchError, Panel, PanelSource, PanelState};
pub use config::WeathercastConfig;
pub use error::ProxyError;
pub use models::{ForecastSnapshot, WeatherSnapshot};
pub use provider::{OpenWeatherMapClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the proxy
pub type Result<T> = std::result::Result<T, ProxyError>;
