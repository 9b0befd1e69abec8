use std::sync::Arc;

use axum::Router;

use crate::AppWidget;

mod health;
mod panel;

// ---

pub fn router(widget: Arc<AppWidget>) -> Router {
    // ---
    Router::new()
        .merge(panel::router())
        .merge(health::router())
        .with_state(widget)
}
