//! In-process stand-in for the LASS API, used by unit tests.
//!
//! A `None` body makes the matching endpoint answer 500.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

// ---

#[derive(Clone, Default)]
struct MockState {
    nearest: Option<Value>,
    last: Option<Value>,
    coordinates: Arc<Mutex<Vec<(String, String)>>>,
    devices: Arc<Mutex<Vec<String>>>,
}

pub struct MockLass {
    pub base_url: String,
    state: MockState,
}

impl MockLass {
    pub async fn start(nearest: Option<Value>, last: Option<Value>) -> Self {
        // ---
        let state = MockState {
            nearest,
            last,
            ..Default::default()
        };

        let app = Router::new()
            .route("/API-1.0.0/device/nearest/lat/{lat}/lon/{lon}/", get(nearest_handler))
            .route("/data/last.php", get(last_reading_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockLass {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn nearest_hits(&self) -> usize {
        self.state.coordinates.lock().unwrap().len()
    }

    pub fn seen_coordinates(&self) -> Vec<(String, String)> {
        self.state.coordinates.lock().unwrap().clone()
    }

    pub fn seen_devices(&self) -> Vec<String> {
        self.state.devices.lock().unwrap().clone()
    }
}

/// A well-formed `last.php` body reporting `pm25`.
pub fn last_reading_body(pm25: f64) -> Value {
    // ---
    json!({
        "source": "last-all-airbox",
        "feeds": [{
            "AirBox": {
                "s_t0": 22.5,
                "s_h0": 61,
                "s_d0": pm25,
                "SiteName": "Taipei Station",
                "timestamp": "2025-03-26T18:45:00Z"
            }
        }]
    })
}

fn respond(body: &Option<Value>) -> Response {
    match body {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn nearest_handler(
    Path((lat, lon)): Path<(String, String)>,
    State(state): State<MockState>,
) -> Response {
    state.coordinates.lock().unwrap().push((lat, lon));
    respond(&state.nearest)
}

async fn last_reading_handler(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<MockState>,
) -> Response {
    if let Some(id) = params.get("device_id") {
        state.devices.lock().unwrap().push(id.clone());
    }
    respond(&state.last)
}
