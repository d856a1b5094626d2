use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::dto::maintenance_task_dto::{parse_task_fields, MaintenanceTaskDraft};
use crate::dto::PayloadMode;
use crate::filters::{FilterSet, MAINTENANCE_TASK_FILTERS};
use crate::models::{MaintenanceTask, MaintenanceTaskPatch};
use crate::repositories::{MaintenanceTaskRepository, VehicleRepository};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult, FieldErrors};
use crate::utils::validation::does_not_exist;

pub struct MaintenanceTaskController {
    repository: Arc<dyn MaintenanceTaskRepository>,
    vehicles: Arc<dyn VehicleRepository>,
}

impl MaintenanceTaskController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.tasks.clone(),
            vehicles: state.vehicles.clone(),
        }
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> AppResult<Vec<MaintenanceTask>> {
        info!("Fetching all maintenance tasks");
        let filters = FilterSet::from_query(MAINTENANCE_TASK_FILTERS, params);
        let tasks = self.repository.list(&filters).await?;
        info!("{} maintenance tasks retrieved", tasks.len());
        Ok(tasks)
    }

    /// Field checks plus the vehicle reference check, all errors together.
    async fn validate(&self, payload: &Value, mode: PayloadMode) -> AppResult<Result<MaintenanceTaskPatch, FieldErrors>> {
        let mut draft: MaintenanceTaskDraft = match parse_task_fields(payload, mode) {
            Ok(draft) => draft,
            Err(errors) => return Ok(Err(errors)),
        };

        if let Some(vehicle) = draft.vehicle_id() {
            if !self.vehicles.exists(vehicle).await? {
                draft.reject_vehicle(does_not_exist(vehicle));
            }
        }
        Ok(draft.finish())
    }

    pub async fn create(&self, payload: &Value) -> AppResult<MaintenanceTask> {
        info!("Creating a new maintenance task");
        let new_task = self
            .validate(payload, PayloadMode::Create)
            .await?
            .and_then(|fields| {
                fields.into_new().ok_or_else(|| {
                    let mut errors = FieldErrors::new();
                    errors.add("non_field_errors", "Incomplete maintenance task payload.");
                    errors
                })
            })
            .map_err(|errors| {
                warn!("Maintenance task creation failed: {}", errors);
                AppError::Validation(errors)
            })?;

        let task = self.repository.create(new_task).await?;
        info!("Maintenance task {} created successfully", task.id);
        Ok(task)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<MaintenanceTask> {
        info!("Fetching maintenance task with ID: {}", id);
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("MaintenanceTask", &id.to_string()))
    }

    pub async fn update(&self, id: i64, payload: AppResult<Value>) -> AppResult<MaintenanceTask> {
        info!("Updating maintenance task with ID: {}", id);
        self.get_by_id(id).await?;

        let patch = self
            .validate(&payload?, PayloadMode::Partial)
            .await?
            .map_err(|errors| {
                warn!("Maintenance task update failed: {}", errors);
                AppError::Validation(errors)
            })?;

        let task = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found_error("MaintenanceTask", &id.to_string()))?;
        info!("Maintenance task with ID {} updated successfully", id);
        Ok(task)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        info!("Deleting maintenance task with ID: {}", id);
        if !self.repository.delete(id).await? {
            return Err(not_found_error("MaintenanceTask", &id.to_string()));
        }
        info!("Maintenance task with ID {} deleted successfully", id);
        Ok(())
    }
}
