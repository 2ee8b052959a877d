//! Unauthenticated service endpoints.
//!
//! - `/health` - liveness probe, also reports whether the cache is attached
//! - `/` - service banner

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Sutra HRMS API";

/// GET /health - Liveness probe.
///
/// Always 200, even with the cache detached.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "cache": if state.cache.is_connected().await { "connected" } else { "disconnected" },
    }))
}

/// GET / - Service banner.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", SERVICE_NAME),
        "health": "/health",
    }))
}
