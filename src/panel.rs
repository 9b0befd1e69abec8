//! Presentation of a reading: the panel record handed to whatever draws the
//! widget, its plain-text rendering, and the error panel.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::{Reading, SeverityTier};

// ---

/// Everything needed to draw one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    // ---
    pub label: &'static str,
    pub background_color: &'static str,
    pub gradient_end_color: &'static str,
    pub text_color: &'static str,
    pub pm25: f64,
    pub temperature: f64,
    pub relative_humidity: f64,
    pub site_name: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    /// `timestamp` formatted in the configured zone.
    pub updated_at: String,
}

/// Body returned in place of a panel when an invocation fails.
#[derive(Debug, Serialize)]
pub struct ErrorPanel {
    pub error: String,
}

impl Panel {
    pub fn new(reading: Reading, tier: &SeverityTier, zone: FixedOffset) -> Self {
        // ---
        Panel {
            label: tier.label,
            background_color: tier.background_color(),
            gradient_end_color: tier.end_color,
            text_color: tier.text_color,
            pm25: reading.pm25,
            temperature: reading.temperature,
            relative_humidity: reading.relative_humidity,
            updated_at: format_updated_at(reading.timestamp, zone),
            site_name: reading.site_name,
            device_id: reading.device_id,
            timestamp: reading.timestamp,
        }
    }

    /// Text rendering, one panel line per output line.
    pub fn render_text(&self) -> String {
        // ---
        [
            self.label.to_string(),
            format!("粉塵 {} ug/m3", self.pm25),
            format!("{} °C", self.temperature),
            format!("RH {}%", self.relative_humidity),
            self.site_name.clone(),
            self.updated_at.clone(),
        ]
        .join("\n")
    }
}

impl ErrorPanel {
    /// `error: <message>` including the cause chain.
    pub fn new(err: &anyhow::Error) -> Self {
        ErrorPanel {
            error: format!("error: {:#}", err),
        }
    }
}

/// `Mar 26, 2025, 06:45 PM` style, in `zone`.
pub fn format_updated_at(timestamp: DateTime<Utc>, zone: FixedOffset) -> String {
    timestamp
        .with_timezone(&zone)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}
