use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weathercast::config::{LoggingConfig, WeathercastConfig};
use weathercast::{Dashboard, OpenWeatherMapClient, WeatherProvider, web};

#[derive(Parser)]
#[command(name = "weathercast")]
#[command(about = "Weather proxy and live weather display", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the weather proxy
    Serve {
        /// Configuration file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Override the listening port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show current weather and forecast, reading location edits from stdin
    ///
    /// A plain line changes both panels. Prefix it with `current:` or
    /// `forecast:` to change a single panel.
    Watch {
        /// Configuration file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Proxy base URL
        #[arg(long, value_name = "URL")]
        backend: Option<String>,

        /// Location shown on startup
        #[arg(long)]
        location: Option<String>,
    },
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("weathercast={fallback},tower_http={fallback}").into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, port } => {
            let mut config = WeathercastConfig::load_from_path(config)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config.logging, cli.verbose);
            serve(config).await
        }
        Command::Watch {
            config,
            backend,
            location,
        } => {
            let mut config = WeathercastConfig::load_from_path(config)?;
            if let Some(backend) = backend {
                config.client.backend_url = backend;
            }
            if let Some(location) = location {
                config.client.default_location = location;
            }
            init_tracing(&config.logging, cli.verbose);
            watch(config).await
        }
    }
}

async fn serve(config: WeathercastConfig) -> Result<()> {
    tracing::info!("Starting weathercast proxy v{}", weathercast::VERSION);

    let provider: Arc<dyn WeatherProvider> = Arc::new(
        OpenWeatherMapClient::new(config.upstream.clone())
            .context("Failed to create weather provider")?,
    );
    web::run(&config.server, provider).await
}

async fn watch(config: WeathercastConfig) -> Result<()> {
    let dashboard = Dashboard::connect(&config.client).context("Failed to create display client")?;
    let mut current = dashboard.subscribe_current();
    let mut forecast = dashboard.subscribe_forecast();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{}", dashboard.current_view());
    println!("{}", dashboard.forecast_view());

    loop {
        tokio::select! {
            changed = current.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", dashboard.current_view());
            }
            changed = forecast.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", dashboard.forecast_view());
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) => apply_edit(&dashboard, &line),
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn apply_edit(dashboard: &Dashboard, line: &str) {
    let line = line.trim();
    if let Some(location) = line.strip_prefix("current:") {
        dashboard.edit_current_location(location.trim());
    } else if let Some(location) = line.strip_prefix("forecast:") {
        dashboard.edit_forecast_location(location.trim());
    } else {
        dashboard.edit_location(line);
    }
}
