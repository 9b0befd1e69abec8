//! Client for the LASS (Location Aware Sensing System) PM2.5 API.
//!
//! Two endpoints are used:
//! - `API-1.0.0/device/nearest/lat/{lat}/lon/{lon}/` – sensors ordered by distance
//! - `data/last.php?device_id={id}` – latest AirBox reading for one device
//!
//! Both are plain GETs with JSON bodies; non-2xx statuses are errors.

use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::{Coordinate, LastReadingResponse, NearestResponse, Reading};

// ---

/// Remote air-quality data used by the resolver and the widget.
pub trait AirQualityApi {
    /// Device ids near `at`, nearest first.
    fn nearest_device_ids(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Latest reading published by `device_id`.
    fn last_reading(&self, device_id: &str) -> impl Future<Output = Result<Reading>> + Send;
}

#[derive(Debug, Clone)]
pub struct LassClient {
    client: Client,
    base_url: String,
}

impl LassClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        // ---
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn nearest_url(&self, at: Coordinate) -> String {
        format!(
            "{}/API-1.0.0/device/nearest/lat/{}/lon/{}/",
            self.base_url, at.latitude, at.longitude
        )
    }

    fn last_reading_url(&self) -> String {
        format!("{}/data/last.php", self.base_url)
    }
}

impl AirQualityApi for LassClient {
    async fn nearest_device_ids(&self, at: Coordinate) -> Result<Vec<String>> {
        // ---
        let url = self.nearest_url(at);
        debug!("Fetching nearest sensors from: {}", url);

        let response: NearestResponse = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("Failed to fetch nearest sensor list")?
            .json()
            .await
            .context("Failed to decode nearest sensor list")?;

        debug!("Nearest sensor list has {} entries", response.feeds.len());
        response.device_ids()
    }

    async fn last_reading(&self, device_id: &str) -> Result<Reading> {
        // ---
        let url = self.last_reading_url();
        debug!("Fetching last reading for {} from: {}", device_id, url);

        let response: LastReadingResponse = self
            .client
            .get(&url)
            .query(&[("device_id", device_id)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch last reading for sensor {}", device_id))?
            .json()
            .await
            .with_context(|| format!("Failed to decode last reading for sensor {}", device_id))?;

        let reading = response.into_reading(device_id)?;
        debug!("Last reading: {:?}", reading);
        Ok(reading)
    }
}
