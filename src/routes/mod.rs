//! HTTP routes
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | GET, POST | `/vehicles/` | list (filterable), create |
//! | GET, PATCH, DELETE | `/vehicles/:id/` | retrieve, partial update, delete |
//! | GET, POST | `/tasks/` | list (filterable), create |
//! | GET, PATCH, DELETE | `/tasks/:id/` | retrieve, partial update, delete |
//! | GET | `/health` | liveness |

pub mod health_routes;
pub mod maintenance_task_routes;
pub mod vehicle_routes;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap};
use axum::{Json, Router};
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes::create_health_router())
        .merge(vehicle_routes::create_vehicle_router())
        .merge(maintenance_task_routes::create_maintenance_task_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Path ids are integers; anything else cannot name a record.
pub(crate) fn parse_id(raw: &str, resource: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| not_found_error(resource, raw))
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(unsupported_media_type()),
        Err(rejection) => Err(AppError::BadRequest(format!(
            "JSON parse error - {}",
            rejection.body_text()
        ))),
    }
}

fn unsupported_media_type() -> AppError {
    AppError::UnsupportedMediaType("Expected request with `Content-Type: application/json`.".to_string())
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Body of a partial update. An empty body is an empty patch, whatever the
/// content type; anything else must be JSON.
pub(crate) fn partial_json_body(headers: &HeaderMap, body: &Bytes) -> AppResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    if !has_json_content_type(headers) {
        return Err(unsupported_media_type());
    }
    json_body(Json::<Value>::from_bytes(body))
}
