//! MaintenanceTask model
//!
//! A task belongs to exactly one vehicle. On the wire the `vehicle` field is
//! the vehicle's id; in the table it is the `vehicle_id` foreign key.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const TASK_TYPE_MAX_LENGTH: u64 = 100;
pub const STATUS_MAX_LENGTH: u64 = 50;

/// A stored maintenance task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MaintenanceTask {
    pub id: i64,
    #[sqlx(rename = "vehicle_id")]
    pub vehicle: i64,
    pub task_type: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaintenanceTask {
    pub vehicle: i64,
    pub task_type: String,
    pub status: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct MaintenanceTaskPatch {
    pub vehicle: Option<i64>,

    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub task_type: Option<String>,

    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub status: Option<String>,
}

impl MaintenanceTaskPatch {
    pub fn into_new(self) -> Option<NewMaintenanceTask> {
        Some(NewMaintenanceTask {
            vehicle: self.vehicle?,
            task_type: self.task_type?,
            status: self.status?,
        })
    }

    pub fn apply_to(self, task: &mut MaintenanceTask) {
        if let Some(vehicle) = self.vehicle {
            task.vehicle = vehicle;
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

impl NewMaintenanceTask {
    pub fn with_id(self, id: i64) -> MaintenanceTask {
        MaintenanceTask {
            id,
            vehicle: self.vehicle,
            task_type: self.task_type,
            status: self.status,
        }
    }
}
