//! Current-location source for nearest-sensor discovery.

use anyhow::{anyhow, Result};

use crate::{Coordinate, LocationProvider};

// ---

/// Location taken from configuration (`AIRBOX_LAT` / `AIRBOX_LON`).
///
/// Unset coordinates only become an error when discovery needs them.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredLocation(pub Option<Coordinate>);

impl LocationProvider for ConfiguredLocation {
    async fn current(&self) -> Result<Coordinate> {
        self.0
            .ok_or_else(|| anyhow!("Location unavailable: set AIRBOX_LAT and AIRBOX_LON"))
    }
}
