use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness probe
async fn health_check() -> Json<serde_json::Value> {
    tracing::debug!("Health check requested");
    Json(json!({
        "status": "ok",
        "service": "fleet-maintenance",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
