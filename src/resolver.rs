//! Sensor resolution: a saved device id wins, otherwise the nearest sensor
//! to the current location is discovered through the LASS API.

use std::future::Future;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::{AirQualityApi, Coordinate};

// ---

/// Source of a previously saved device id.
pub trait SensorStore {
    /// `Ok(None)` when nothing usable is saved.
    fn load_device_id(&self) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Source of the current coordinate. May fail or be unavailable.
pub trait LocationProvider {
    fn current(&self) -> impl Future<Output = Result<Coordinate>> + Send;
}

/// Pick the device id to query.
///
/// A saved id short-circuits everything else: no location lookup and no
/// network request happen. Otherwise the nearest sensor is used, and an
/// empty candidate list is an error.
pub async fn resolve_sensor_id<S, L, A>(store: &S, location: &L, api: &A) -> Result<String>
where
    S: SensorStore,
    L: LocationProvider,
    A: AirQualityApi,
{
    // ---
    if let Some(device_id) = store.load_device_id().await? {
        info!("Using saved sensor: {}", device_id);
        return Ok(device_id);
    }

    debug!("Getting coordinates...");
    let here = location
        .current()
        .await
        .context("Failed to get current location")?;
    debug!("lat: {}, lon: {}", here.latitude, here.longitude);

    debug!("Fetching nearest sensor list...");
    let candidates = api.nearest_device_ids(here).await?;
    for (i, device_id) in candidates.iter().enumerate() {
        debug!("Sensor {}: {}", i + 1, device_id);
    }

    let nearest = candidates.into_iter().next().ok_or_else(|| {
        anyhow!(
            "No sensors found near {:.4}, {:.4}",
            here.latitude,
            here.longitude
        )
    })?;

    info!("Using nearest sensor: {}", nearest);
    Ok(nearest)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::Reading;
    use anyhow::bail;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct SavedId(Option<&'static str>);

    impl SensorStore for SavedId {
        async fn load_device_id(&self) -> Result<Option<String>> {
            Ok(self.0.map(String::from))
        }
    }

    struct BrokenStore;

    impl SensorStore for BrokenStore {
        async fn load_device_id(&self) -> Result<Option<String>> {
            bail!("sensor.json is not valid JSON")
        }
    }

    struct Fixed(Option<Coordinate>, AtomicUsize);

    impl Fixed {
        fn at(latitude: f64, longitude: f64) -> Self {
            Fixed(Some(Coordinate::new(latitude, longitude).unwrap()), AtomicUsize::new(0))
        }

        fn denied() -> Self {
            Fixed(None, AtomicUsize::new(0))
        }
    }

    impl LocationProvider for Fixed {
        async fn current(&self) -> Result<Coordinate> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.ok_or_else(|| anyhow!("location permission denied"))
        }
    }

    #[derive(Default)]
    struct FakeApi {
        nearest: Vec<&'static str>,
        queries: Mutex<Vec<Coordinate>>,
    }

    impl FakeApi {
        fn with(nearest: Vec<&'static str>) -> Self {
            FakeApi {
                nearest,
                ..Default::default()
            }
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    impl AirQualityApi for FakeApi {
        async fn nearest_device_ids(&self, at: Coordinate) -> Result<Vec<String>> {
            self.queries.lock().unwrap().push(at);
            Ok(self.nearest.iter().map(|s| s.to_string()).collect())
        }

        async fn last_reading(&self, device_id: &str) -> Result<Reading> {
            bail!("unexpected last_reading({device_id})")
        }
    }

    #[tokio::test]
    async fn test_saved_id_skips_discovery() {
        // ---
        let location = Fixed::at(25.04, 121.51);
        let api = FakeApi::with(vec!["NEAR-1"]);

        let id = resolve_sensor_id(&SavedId(Some("12345")), &location, &api)
            .await
            .unwrap();

        assert_eq!(id, "12345");
        assert_eq!(api.query_count(), 0);
        assert_eq!(location.1.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_nearest_wins_without_saved_id() {
        // ---
        let location = Fixed::at(25.04, 121.51);
        let api = FakeApi::with(vec!["NEAR-1", "NEAR-2", "NEAR-3"]);

        let id = resolve_sensor_id(&SavedId(None), &location, &api)
            .await
            .unwrap();

        assert_eq!(id, "NEAR-1");
        assert_eq!(api.query_count(), 1);
        assert_eq!(
            api.queries.lock().unwrap()[0],
            Coordinate::new(25.04, 121.51).unwrap()
        );
    }

    #[tokio::test]
    async fn test_empty_candidate_list_fails() {
        // ---
        let api = FakeApi::with(vec![]);

        let err = resolve_sensor_id(&SavedId(None), &Fixed::at(25.0, 121.0), &api)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No sensors found"));
        assert_eq!(api.query_count(), 1);
    }

    #[tokio::test]
    async fn test_location_failure_propagates() {
        // ---
        let api = FakeApi::with(vec!["NEAR-1"]);

        let err = resolve_sensor_id(&SavedId(None), &Fixed::denied(), &api)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("location permission denied"));
        assert_eq!(api.query_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        // ---
        let api = FakeApi::with(vec!["NEAR-1"]);

        let result = resolve_sensor_id(&BrokenStore, &Fixed::at(25.0, 121.0), &api).await;

        assert!(result.is_err());
        assert_eq!(api.query_count(), 0);
    }
}
