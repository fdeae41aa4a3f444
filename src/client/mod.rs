//! Reactive display client
//!
//! Two panels, current weather and forecast, each with its own location
//! input. Edits are debounced, fetched from the proxy backend and rendered
//! from whatever the latest applicable snapshot carries.

pub mod backend;
pub mod dashboard;
pub mod debounce;
pub mod panel;
pub mod phrases;
pub mod view;

pub use backend::{BackendClient, CurrentWeatherSource, FetchError, ForecastSource};
pub use dashboard::{Dashboard, DebouncedPanel};
pub use debounce::Debouncer;
pub use panel::{Panel, PanelSource, PanelState};
pub use view::{CurrentView, ForecastView, PanelStatus};
