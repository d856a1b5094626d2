use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::{json_body, parse_id, partial_json_body};
use crate::controllers::vehicle_controller::VehicleController;
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles/", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/:id/",
            get(get_vehicle).patch(update_vehicle).delete(delete_vehicle),
        )
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    let vehicles = controller.list(&params).await?;
    Ok(Json(vehicles))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let payload = json_body(payload)?;
    let controller = VehicleController::new(&state);
    let vehicle = controller.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    let id = parse_id(&id, "Vehicle")?;
    let controller = VehicleController::new(&state);
    let vehicle = controller.get_by_id(id).await?;
    Ok(Json(vehicle))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vehicle>, AppError> {
    let id = parse_id(&id, "Vehicle")?;
    let controller = VehicleController::new(&state);
    let vehicle = controller.update(id, partial_json_body(&headers, &body)).await?;
    Ok(Json(vehicle))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "Vehicle")?;
    let controller = VehicleController::new(&state);
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
