//! Application entry point for `airbox-widget`.
//!
//! Shows the air quality reported by a LASS AirBox sensor as a small panel:
//! a severity label chosen from the pm2.5 reading, the reading itself,
//! temperature, humidity, site name and when the sensor last reported.
//!
//! The sensor is the one saved in `sensor.json` if there is one, otherwise
//! the sensor nearest to `AIRBOX_LAT`/`AIRBOX_LON`.
//!
//! # Usage
//! ```text
//! airbox-widget            # print the panel as text
//! airbox-widget --json     # print the panel as JSON
//! airbox-widget --serve    # serve GET /panel and GET /health
//! ```
//!
//! # Environment Variables
//! - `AIRBOX_API_URL`, `AIRBOX_SENSOR_FILE`, `AIRBOX_LAT`, `AIRBOX_LON`,
//!   `AIRBOX_UTC_OFFSET_MINUTES`, `AIRBOX_LISTEN_ADDR` – see [`config`]
//! - `AIRBOX_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `AIRBOX_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! Logs go to stderr; stdout carries only the panel.
use std::{env, sync::Arc};

use anyhow::{bail, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

mod config;
mod lass;
mod location;
#[cfg(test)]
mod mock_lass;
mod models;
mod panel;
mod resolver;
mod routes;
mod severity;
mod store;
mod widget;

// Re-exported so sibling modules depend on their parent, not on each other.
pub use lass::{AirQualityApi, LassClient};
pub use location::ConfiguredLocation;
pub use models::{Coordinate, LastReadingResponse, NearestResponse, Reading, SavedSensorRecord};
pub use panel::{ErrorPanel, Panel};
pub use resolver::{resolve_sensor_id, LocationProvider, SensorStore};
pub use severity::{classify, SeverityTier};
pub use store::FileSensorStore;
pub use widget::Widget;

/// The widget as wired from configuration.
pub type AppWidget = Widget<FileSensorStore, ConfiguredLocation, LassClient>;

/// What to do with the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Text,
    Json,
    Serve,
}

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let Some(mode) = parse_args(env::args().skip(1))? else {
        print_usage();
        return Ok(());
    };

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let widget = Widget::new(
        FileSensorStore::new(cfg.sensor_file.clone()),
        ConfiguredLocation(cfg.location),
        LassClient::new(reqwest::Client::new(), cfg.api_url.clone()),
        cfg.utc_offset,
    );

    match mode {
        Mode::Text => match widget.present().await {
            Ok(panel) => println!("{}", panel.render_text()),
            Err(error) => println!("{}", error.error),
        },
        Mode::Json => {
            let json = match widget.present().await {
                Ok(panel) => serde_json::to_string_pretty(&panel)?,
                Err(error) => serde_json::to_string_pretty(&error)?,
            };
            println!("{}", json);
        }
        Mode::Serve => {
            let app: Router = routes::router(Arc::new(widget));

            tracing::info!("Listening on {}", cfg.listen_addr);
            let listener = tokio::net::TcpListener::bind(cfg.listen_addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Parse command-line flags. `Ok(None)` means help was requested.
fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<Mode>> {
    // ---
    let mut mode = Mode::Text;
    for arg in args {
        mode = match arg.as_str() {
            "--json" => Mode::Json,
            "--serve" => Mode::Serve,
            "-h" | "--help" => return Ok(None),
            other => bail!("Unknown argument '{}'; see --help", other),
        };
    }
    Ok(Some(mode))
}

fn print_usage() {
    println!("Usage: airbox-widget [--json | --serve]");
    println!();
    println!("  (no flag)  print the air-quality panel as text");
    println!("  --json     print the panel as JSON");
    println!("  --serve    serve GET /panel and GET /health on AIRBOX_LISTEN_ADDR");
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Output on stderr, with target, file, and line number enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY on stderr
/// - Span event emission mode controlled by the `AIRBOX_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level from `RUST_LOG`, else `AIRBOX_LOG_LEVEL`
///
/// Called once at startup before any logging macros are invoked.
fn init_tracing() {
    // ---
    let span_events = match env::var("AIRBOX_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stderr().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to AIRBOX_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AIRBOX_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("{level},hyper=warn,reqwest=warn"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
