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
use crate::controllers::maintenance_task_controller::MaintenanceTaskController;
use crate::models::MaintenanceTask;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_task_router() -> Router<AppState> {
    Router::new()
        .route("/tasks/", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id/",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<MaintenanceTask>>, AppError> {
    let controller = MaintenanceTaskController::new(&state);
    let tasks = controller.list(&params).await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MaintenanceTask>), AppError> {
    let payload = json_body(payload)?;
    let controller = MaintenanceTaskController::new(&state);
    let task = controller.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MaintenanceTask>, AppError> {
    let id = parse_id(&id, "MaintenanceTask")?;
    let controller = MaintenanceTaskController::new(&state);
    let task = controller.get_by_id(id).await?;
    Ok(Json(task))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MaintenanceTask>, AppError> {
    let id = parse_id(&id, "MaintenanceTask")?;
    let controller = MaintenanceTaskController::new(&state);
    let task = controller.update(id, partial_json_body(&headers, &body)).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "MaintenanceTask")?;
    let controller = MaintenanceTaskController::new(&state);
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
