//! Rendering of panel state into display fields
//!
//! Every field is read through optional lookups; anything the snapshot does
//! not carry renders as [`PLACEHOLDER`].

use std::fmt::{self, Display};

use super::panel::PanelState;
use super::phrases::phrase_for;
use crate::models::{ForecastEntry, ForecastSnapshot, MainMeasurements, WeatherSnapshot, Wind};

pub const PLACEHOLDER: &str = "--";

/// Number of upcoming forecast buckets listed under the headline
const TIMELINE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelStatus {
    Idle,
    Loading,
    Ready,
    Unavailable(String),
}

impl<S> From<&PanelState<S>> for PanelStatus {
    fn from(state: &PanelState<S>) -> Self {
        match state {
            PanelState::Idle => PanelStatus::Idle,
            PanelState::Fetching { .. } => PanelStatus::Loading,
            PanelState::Displaying { .. } => PanelStatus::Ready,
            PanelState::Unavailable { reason, .. } => PanelStatus::Unavailable(reason.clone()),
        }
    }
}

impl Display for PanelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelStatus::Idle => write!(f, "idle"),
            PanelStatus::Loading => write!(f, "loading"),
            PanelStatus::Ready => write!(f, "ok"),
            PanelStatus::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn temperature(value: Option<f64>) -> String {
    or_placeholder(value.map(|t| format!("{t:.1}°C")))
}

fn humidity(value: Option<f64>) -> String {
    or_placeholder(value.map(|h| format!("{h}%")))
}

fn wind_speed(wind: Option<&Wind>) -> String {
    or_placeholder(wind.and_then(|w| w.speed).map(|s| format!("{s:.1} m/s")))
}

/// The seven measurement fields shared by both panels
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub temp_max: String,
    pub temp_min: String,
    pub description: String,
    pub wind_speed: String,
}

impl Measurements {
    fn read(main: Option<&MainMeasurements>, description: Option<&str>, wind: Option<&Wind>) -> Self {
        Self {
            temperature: temperature(main.and_then(|m| m.temp)),
            feels_like: temperature(main.and_then(|m| m.feels_like)),
            humidity: humidity(main.and_then(|m| m.humidity)),
            temp_max: temperature(main.and_then(|m| m.temp_max)),
            temp_min: temperature(main.and_then(|m| m.temp_min)),
            description: or_placeholder(description.map(str::to_string)),
            wind_speed: wind_speed(wind),
        }
    }

    fn empty() -> Self {
        Self::read(None, None, None)
    }
}

impl Display for Measurements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   Temperature: {}", self.temperature)?;
        writeln!(f, "   Feels like:  {}", self.feels_like)?;
        writeln!(f, "   Humidity:    {}", self.humidity)?;
        writeln!(f, "   Max:         {}", self.temp_max)?;
        writeln!(f, "   Min:         {}", self.temp_min)?;
        writeln!(f, "   Description: {}", self.description)?;
        writeln!(f, "   Wind speed:  {}", self.wind_speed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub status: PanelStatus,
    pub location: String,
    pub measurements: Measurements,
    /// First air-pollution reading's carbon-monoxide concentration
    pub co2: String,
    pub pressure: String,
    pub aqi: String,
    /// `name: value µg/m³` for every pollutant in the first reading
    pub pollutants: Vec<String>,
    pub phrase: Option<&'static str>,
}

impl CurrentView {
    #[must_use]
    pub fn render(state: &PanelState<WeatherSnapshot>) -> Self {
        let status = PanelStatus::from(state);
        let location = or_placeholder(state.location().map(str::to_string));

        let Some(snapshot) = state.snapshot() else {
            return Self {
                status,
                location,
                measurements: Measurements::empty(),
                co2: PLACEHOLDER.to_string(),
                pressure: PLACEHOLDER.to_string(),
                aqi: PLACEHOLDER.to_string(),
                pollutants: Vec::new(),
                phrase: None,
            };
        };

        let main = snapshot.main.as_ref();
        let reading = snapshot.air_reading();
        let pollutants: Vec<String> = reading
            .and_then(|r| r.components.as_ref())
            .map(|c| {
                c.readings()
                    .into_iter()
                    .map(|(name, value)| format!("{name}: {value} µg/m³"))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            status,
            location,
            measurements: Measurements::read(main, snapshot.description(), snapshot.wind.as_ref()),
            co2: or_placeholder(
                reading
                    .and_then(|r| r.components.as_ref())
                    .and_then(|c| c.co)
                    .map(|co| format!("{co:.2} µg/m³")),
            ),
            pressure: or_placeholder(main.and_then(|m| m.pressure).map(|p| format!("{p} hPa"))),
            aqi: or_placeholder(reading.and_then(|r| r.main).and_then(|m| m.aqi).map(|a| a.to_string())),
            pollutants,
            phrase: snapshot.description().and_then(phrase_for),
        }
    }
}

impl Display for CurrentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current weather: {} [{}]", self.location, self.status)?;
        write!(f, "{}", self.measurements)?;
        writeln!(f, "   CO2:         {}", self.co2)?;
        writeln!(f, "   Pressure:    {}", self.pressure)?;
        writeln!(f, "   AQI:         {}", self.aqi)?;
        if !self.pollutants.is_empty() {
            writeln!(f, "   Pollutants:")?;
            for line in &self.pollutants {
                writeln!(f, "      {line}")?;
            }
        }
        if let Some(phrase) = self.phrase {
            writeln!(f, "   {phrase}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub status: PanelStatus,
    pub location: String,
    /// Headline fields, read from the nearest time bucket
    pub measurements: Measurements,
    /// `time: temp, description` lines for the following buckets
    pub timeline: Vec<String>,
}

fn timeline_line(entry: &ForecastEntry) -> String {
    format!(
        "{}: {}, {}",
        or_placeholder(entry.label()),
        temperature(entry.main.as_ref().and_then(|m| m.temp)),
        or_placeholder(entry.description().map(str::to_string))
    )
}

impl ForecastView {
    #[must_use]
    pub fn render(state: &PanelState<ForecastSnapshot>) -> Self {
        let status = PanelStatus::from(state);
        let location = or_placeholder(state.location().map(str::to_string));

        let snapshot = state.snapshot();
        let first = snapshot.and_then(|s| s.first());
        let measurements = match first {
            Some(entry) => Measurements::read(entry.main.as_ref(), entry.description(), entry.wind.as_ref()),
            None => Measurements::empty(),
        };
        let timeline: Vec<String> = snapshot
            .map(|s| s.upcoming().take(TIMELINE_LEN).map(timeline_line).collect())
            .unwrap_or_default();

        Self {
            status,
            location,
            measurements,
            timeline,
        }
    }
}

impl Display for ForecastView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast: {} [{}]", self.location, self.status)?;
        write!(f, "{}", self.measurements)?;
        for line in &self.timeline {
            writeln!(f, "   {line}")?;
        }
        Ok(())
    }
}
