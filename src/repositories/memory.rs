//! In-process store
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. Both
//! tables sit behind one lock so the vehicle/task relation stays consistent,
//! mirroring the foreign key and cascade of the Postgres schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MaintenanceTaskRepository, VehicleRepository};
use crate::filters::{ColumnValue, FilterSet, Filterable};
use crate::models::{
    MaintenanceTask, MaintenanceTaskPatch, NewMaintenanceTask, NewVehicle, Vehicle, VehiclePatch,
};
use crate::utils::errors::{AppResult, FieldErrors};
use crate::utils::validation::does_not_exist;

#[derive(Debug, Default)]
struct Tables {
    vehicles: BTreeMap<i64, Vehicle>,
    tasks: BTreeMap<i64, MaintenanceTask>,
    last_vehicle_id: i64,
    last_task_id: i64,
}

impl Tables {
    fn check_vehicle(&self, id: i64) -> Result<(), FieldErrors> {
        if self.vehicles.contains_key(&id) {
            return Ok(());
        }
        let mut errors = FieldErrors::new();
        errors.add("vehicle", does_not_exist(id));
        Err(errors)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn vehicle_column<'a>(vehicle: &'a Vehicle, column: &str) -> Option<ColumnValue<'a>> {
    match column {
        "v.id" => Some(ColumnValue::Integer(vehicle.id)),
        "v.registration_number" => Some(ColumnValue::Text(&vehicle.registration_number)),
        "v.make" => Some(ColumnValue::Text(&vehicle.make)),
        "v.model" => Some(ColumnValue::Text(&vehicle.model)),
        "v.year" => Some(ColumnValue::Integer(i64::from(vehicle.year))),
        _ => None,
    }
}

impl Filterable for Vehicle {
    fn column(&self, column: &str) -> Option<ColumnValue<'_>> {
        vehicle_column(self, column)
    }
}

/// A task joined with its vehicle, the shape task filters run against.
struct TaskRow<'a> {
    task: &'a MaintenanceTask,
    vehicle: Option<&'a Vehicle>,
}

impl Filterable for TaskRow<'_> {
    fn column(&self, column: &str) -> Option<ColumnValue<'_>> {
        match column {
            "t.id" => Some(ColumnValue::Integer(self.task.id)),
            "t.vehicle_id" => Some(ColumnValue::Integer(self.task.vehicle)),
            "t.task_type" => Some(ColumnValue::Text(&self.task.task_type)),
            "t.status" => Some(ColumnValue::Text(&self.task.status)),
            other => self.vehicle.and_then(|v| vehicle_column(v, other)),
        }
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn list(&self, filters: &FilterSet) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .values()
            .filter(|v| filters.matches(*v))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.read().await.vehicles.contains_key(&id))
    }

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        tables.last_vehicle_id += 1;
        let vehicle = vehicle.with_id(tables.last_vehicle_id);
        tables.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, id: i64, patch: VehiclePatch) -> AppResult<Option<Vehicle>> {
        let mut tables = self.tables.write().await;
        Ok(tables.vehicles.get_mut(&id).map(|vehicle| {
            patch.apply_to(vehicle);
            vehicle.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, task| task.vehicle != id);
        Ok(true)
    }
}

#[async_trait]
impl MaintenanceTaskRepository for InMemoryStore {
    async fn list(&self, filters: &FilterSet) -> AppResult<Vec<MaintenanceTask>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|task| {
                let row = TaskRow {
                    task: *task,
                    vehicle: tables.vehicles.get(&task.vehicle),
                };
                filters.matches(&row)
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MaintenanceTask>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn create(&self, task: NewMaintenanceTask) -> AppResult<MaintenanceTask> {
        let mut tables = self.tables.write().await;
        tables.check_vehicle(task.vehicle)?;
        tables.last_task_id += 1;
        let task = task.with_id(tables.last_task_id);
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: i64, patch: MaintenanceTaskPatch) -> AppResult<Option<MaintenanceTask>> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&id) {
            return Ok(None);
        }
        if let Some(vehicle) = patch.vehicle {
            tables.check_vehicle(vehicle)?;
        }
        Ok(tables.tasks.get_mut(&id).map(|task| {
            patch.apply_to(task);
            task.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}
