//! Two independent panels, current weather and forecast, each fed by its
//! own debounced location input.

use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use super::backend::{BackendClient, CurrentWeatherSource, FetchError, ForecastSource};
use super::debounce::Debouncer;
use super::panel::{Panel, PanelSource, PanelState};
use super::view::{CurrentView, ForecastView};
use crate::config::ClientConfig;
use crate::models::{ForecastSnapshot, WeatherSnapshot};

/// A panel together with the debouncer feeding it
#[derive(Debug)]
pub struct DebouncedPanel<Src: PanelSource> {
    panel: Panel<Src>,
    input: Debouncer,
}

impl<Src: PanelSource> DebouncedPanel<Src> {
    pub fn new(panel: Panel<Src>, quiet: Duration) -> Self {
        let target = panel.clone();
        let input = Debouncer::spawn(quiet, move |location| {
            target.request(location);
        });
        Self { panel, input }
    }

    /// Record an edit of this panel's location input
    pub fn edit(&self, location: impl Into<String>) {
        self.input.push(location);
    }

    #[must_use]
    pub fn panel(&self) -> &Panel<Src> {
        &self.panel
    }
}

#[derive(Debug)]
pub struct Dashboard<C: PanelSource = CurrentWeatherSource, F: PanelSource = ForecastSource> {
    current: DebouncedPanel<C>,
    forecast: DebouncedPanel<F>,
}

impl Dashboard {
    /// Build both panels against the configured backend and start the
    /// initial fetch of the default location.
    pub fn connect(settings: &ClientConfig) -> Result<Self, FetchError> {
        let backend = BackendClient::new(&settings.backend_url, settings.request_timeout())?;
        info!("Display client using backend {}", backend.base_url());
        Ok(Self::start(
            backend.current_source(),
            backend.forecast_source(),
            &settings.default_location,
            settings.debounce(),
        ))
    }
}

impl<C, F> Dashboard<C, F>
where
    C: PanelSource<Snapshot = WeatherSnapshot>,
    F: PanelSource<Snapshot = ForecastSnapshot>,
{
    /// Initial load skips the debounce window
    pub fn start(current: C, forecast: F, default_location: &str, quiet: Duration) -> Self {
        let current = DebouncedPanel::new(Panel::new("current", current), quiet);
        let forecast = DebouncedPanel::new(Panel::new("forecast", forecast), quiet);

        current.panel().request(default_location);
        forecast.panel().request(default_location);

        Self { current, forecast }
    }

    /// Apply one edit to both panels' location inputs
    pub fn edit_location(&self, location: &str) {
        self.current.edit(location);
        self.forecast.edit(location);
    }

    pub fn edit_current_location(&self, location: &str) {
        self.current.edit(location);
    }

    pub fn edit_forecast_location(&self, location: &str) {
        self.forecast.edit(location);
    }

    #[must_use]
    pub fn current(&self) -> &Panel<C> {
        self.current.panel()
    }

    #[must_use]
    pub fn forecast(&self) -> &Panel<F> {
        self.forecast.panel()
    }

    #[must_use]
    pub fn subscribe_current(&self) -> watch::Receiver<PanelState<WeatherSnapshot>> {
        self.current.panel().subscribe()
    }

    #[must_use]
    pub fn subscribe_forecast(&self) -> watch::Receiver<PanelState<ForecastSnapshot>> {
        self.forecast.panel().subscribe()
    }

    #[must_use]
    pub fn current_view(&self) -> CurrentView {
        CurrentView::render(&self.current.panel().state())
    }

    #[must_use]
    pub fn forecast_view(&self) -> ForecastView {
        ForecastView::render(&self.forecast.panel().state())
    }
}
