//! `GET /panel` – runs one widget invocation per request.
//!
//! Returns `200` with the panel record, or `502` with `{ "error": "error: ..." }`
//! when the sensor, location or LASS API could not be reached.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tracing::info;

use crate::AppWidget;

// ---

pub fn router() -> Router<Arc<AppWidget>> {
    // ---
    Router::new().route("/panel", get(handler))
}

async fn handler(State(widget): State<Arc<AppWidget>>) -> impl IntoResponse {
    // ---
    info!("GET /panel");

    match widget.present().await {
        Ok(panel) => (StatusCode::OK, Json(panel)).into_response(),
        Err(error) => (StatusCode::BAD_GATEWAY, Json(error)).into_response(),
    }
}
