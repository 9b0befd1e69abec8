//! Data models for the AirBox panel: the saved sensor record, coordinates,
//! LASS API payloads and the normalized reading.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---

/// Saved sensor record, `{ "device_id": "..." }`.
#[derive(Debug, Default, Deserialize)]
pub struct SavedSensorRecord {
    // ---
    #[serde(default)]
    pub device_id: Option<Value>,
}

impl SavedSensorRecord {
    /// The saved id, if it is a non-empty string. Anything else counts as absent.
    pub fn device_id(&self) -> Option<&str> {
        // ---
        match &self.device_id {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.as_str()),
            _ => None,
        }
    }
}

/// A geographic coordinate used for nearest-sensor discovery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        // ---
        if !(-90.0..=90.0).contains(&latitude) {
            bail!("latitude out of range: {}", latitude);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            bail!("longitude out of range: {}", longitude);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Response of `device/nearest/lat/{lat}/lon/{lon}/`.
///
/// Each feed is a single-key object whose key is the device id.
#[derive(Debug, Deserialize)]
pub struct NearestResponse {
    // ---
    #[serde(default)]
    pub feeds: Vec<Map<String, Value>>,
}

impl NearestResponse {
    /// Candidate device ids, nearest first.
    ///
    /// The nearest entry must carry a device id. Keyless entries further
    /// down can never be chosen and are left out.
    pub fn device_ids(&self) -> Result<Vec<String>> {
        // ---
        if let Some(nearest) = self.feeds.first() {
            if nearest.is_empty() {
                bail!("Nearest sensor entry has no device id");
            }
        }
        Ok(self
            .feeds
            .iter()
            .filter_map(|feed| feed.keys().next().cloned())
            .collect())
    }
}

/// Response of `data/last.php?device_id=...`.
#[derive(Debug, Deserialize)]
pub struct LastReadingResponse {
    // ---
    #[serde(default)]
    pub feeds: Vec<LastReadingFeed>,
}

#[derive(Debug, Deserialize)]
pub struct LastReadingFeed {
    #[serde(rename = "AirBox")]
    pub airbox: Option<RawAirBoxReading>,
}

/// Raw AirBox fields as published by LASS.
#[derive(Debug, Deserialize)]
pub struct RawAirBoxReading {
    // ---
    #[serde(rename = "s_t0", deserialize_with = "number_or_string")]
    pub temperature: f64,
    #[serde(rename = "s_h0", deserialize_with = "number_or_string")]
    pub humidity: f64,
    #[serde(rename = "s_d0", deserialize_with = "number_or_string")]
    pub pm25: f64,
    #[serde(rename = "SiteName", default)]
    pub site_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Normalized reading handed to the classifier and the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    // ---
    pub device_id: String,
    pub temperature: f64,
    pub relative_humidity: f64,
    pub pm25: f64,
    pub site_name: String,
    pub timestamp: DateTime<Utc>,
}

impl LastReadingResponse {
    /// Take `feeds[0].AirBox` as the reading for `device_id`.
    pub fn into_reading(self, device_id: &str) -> Result<Reading> {
        // ---
        let raw = self
            .feeds
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No readings published for sensor {}", device_id))?
            .airbox
            .ok_or_else(|| anyhow!("Sensor {} returned no AirBox data", device_id))?;

        Ok(Reading {
            device_id: device_id.to_string(),
            temperature: raw.temperature,
            relative_humidity: raw.humidity,
            pm25: raw.pm25,
            site_name: raw.site_name,
            timestamp: raw.timestamp,
        })
    }
}

/// LASS publishes numbers either as JSON numbers or as numeric strings.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
