//! Configuration loader for the `airbox-widget` panel.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::{anyhow, bail, Result};
use chrono::FixedOffset;
use directories::UserDirs;

use crate::Coordinate;

/// Default LASS API host.
pub const DEFAULT_API_URL: &str = "https://pm25.lass-net.org";

/// File name of the saved sensor record inside the documents directory.
pub const SENSOR_FILE_NAME: &str = "sensor.json";

/// Parse an optional variable into `$ty` with a default value.
macro_rules! parse_env {
    ($var:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $var($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional variable into `Option<$ty>`.
macro_rules! parse_env_opt {
    ($var:expr, $var_name:expr, $ty:ty) => {
        $var($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// LASS API base URL, without trailing slash.
    pub api_url: String,

    /// Path of the saved sensor record.
    pub sensor_file: PathBuf,

    /// Current coordinate, if the host knows it.
    pub location: Option<Coordinate>,

    /// Fixed zone used to format the reading timestamp.
    pub utc_offset: FixedOffset,

    /// Bind address for `--serve`.
    pub listen_addr: SocketAddr,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `AIRBOX_API_URL` – LASS base URL (default: `https://pm25.lass-net.org`)
/// - `AIRBOX_SENSOR_FILE` – saved sensor record (default: `<Documents>/sensor.json`)
/// - `AIRBOX_LAT` / `AIRBOX_LON` – current coordinate, both or neither
/// - `AIRBOX_UTC_OFFSET_MINUTES` – display zone (default: 0, GMT)
/// - `AIRBOX_LISTEN_ADDR` – serve-mode bind address (default: `0.0.0.0:8080`)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration from any variable lookup.
fn load_from(var: impl Fn(&str) -> Option<String>) -> Result<Config> {
    // ---
    let api_url = var("AIRBOX_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let sensor_file = match var("AIRBOX_SENSOR_FILE") {
        Some(path) => PathBuf::from(path),
        None => default_sensor_file()?,
    };

    let lat = parse_env_opt!(var, "AIRBOX_LAT", f64);
    let lon = parse_env_opt!(var, "AIRBOX_LON", f64);
    let location = match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)?),
        (None, None) => None,
        _ => bail!("AIRBOX_LAT and AIRBOX_LON must be set together"),
    };

    let offset_minutes = parse_env!(var, "AIRBOX_UTC_OFFSET_MINUTES", i32, 0);
    let utc_offset = offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow!("Invalid AIRBOX_UTC_OFFSET_MINUTES: {}", offset_minutes))?;

    let listen_addr = parse_env!(
        var,
        "AIRBOX_LISTEN_ADDR",
        SocketAddr,
        SocketAddr::from(([0, 0, 0, 0], 8080))
    );

    Ok(Config {
        api_url,
        sensor_file,
        location,
        utc_offset,
        listen_addr,
    })
}

/// `<Documents>/sensor.json`, falling back to the home directory when the
/// platform has no documents folder.
fn default_sensor_file() -> Result<PathBuf> {
    // ---
    let dirs = UserDirs::new().ok_or_else(|| {
        anyhow!("Cannot determine home directory; set AIRBOX_SENSOR_FILE explicitly")
    })?;
    let dir = dirs.document_dir().unwrap_or_else(|| dirs.home_dir());
    Ok(dir.join(SENSOR_FILE_NAME))
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Coordinates are rounded so logs do not carry a precise location.
    pub fn log_config(&self) {
        // ---
        let location = match &self.location {
            Some(c) => format!("{:.2}, {:.2}", c.latitude, c.longitude),
            None => "(unset)".to_string(),
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  AIRBOX_API_URL     : {}", self.api_url);
        tracing::info!("  AIRBOX_SENSOR_FILE : {}", self.sensor_file.display());
        tracing::info!("  AIRBOX_LAT/LON     : {}", location);
        tracing::info!("  UTC offset         : {}", self.utc_offset);
        tracing::info!("  AIRBOX_LISTEN_ADDR : {}", self.listen_addr);
    }
}
