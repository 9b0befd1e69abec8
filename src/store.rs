//! Saved sensor record on disk (`sensor.json`).

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{SavedSensorRecord, SensorStore};

// ---

/// Reads `{ "device_id": "..." }` from a JSON file.
///
/// A missing file means "nothing saved". An unreadable or malformed file is
/// an error.
#[derive(Debug, Clone)]
pub struct FileSensorStore {
    path: PathBuf,
}

impl FileSensorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SensorStore for FileSensorStore {
    async fn load_device_id(&self) -> Result<Option<String>> {
        // ---
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to check saved sensor file '{}'", self.path.display()))?;
        if !exists {
            tracing::debug!("No saved sensor file at {}", self.path.display());
            return Ok(None);
        }

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read saved sensor file '{}'", self.path.display()))?;
        let record: SavedSensorRecord = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse saved sensor file '{}'", self.path.display()))?;

        let device_id = record.device_id().map(String::from);
        if device_id.is_none() {
            tracing::debug!("Saved sensor file has no device_id; ignoring it");
        }
        Ok(device_id)
    }
}
