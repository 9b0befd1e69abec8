//! One widget invocation: resolve the sensor, fetch its last reading,
//! classify it and build the panel.

use chrono::FixedOffset;
use tracing::{error, info};

use crate::{
    classify, resolve_sensor_id, AirQualityApi, ErrorPanel, LocationProvider, Panel, SensorStore,
};

// ---

pub struct Widget<S, L, A> {
    store: S,
    location: L,
    api: A,
    zone: FixedOffset,
}

impl<S, L, A> Widget<S, L, A>
where
    S: SensorStore,
    L: LocationProvider,
    A: AirQualityApi,
{
    pub fn new(store: S, location: L, api: A, zone: FixedOffset) -> Self {
        Self {
            store,
            location,
            api,
            zone,
        }
    }

    /// Run the whole chain once. Any failure aborts the invocation.
    pub async fn refresh(&self) -> anyhow::Result<Panel> {
        // ---
        let device_id = resolve_sensor_id(&self.store, &self.location, &self.api).await?;
        let reading = self.api.last_reading(&device_id).await?;
        let tier = classify(reading.pm25);

        info!(
            "Sensor {} ({}): pm2.5 {} -> {}",
            reading.device_id, reading.site_name, reading.pm25, tier.label
        );
        Ok(Panel::new(reading, tier, self.zone))
    }

    /// Like [`Widget::refresh`], with failures turned into the error panel.
    pub async fn present(&self) -> Result<Panel, ErrorPanel> {
        // ---
        self.refresh().await.map_err(|e| {
            error!("Widget refresh failed: {:#}", e);
            ErrorPanel::new(&e)
        })
    }
}
