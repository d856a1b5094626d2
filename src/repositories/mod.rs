//! Data access
//!
//! One repository trait per resource so handlers never depend on the storage
//! technology. `postgres` backs them with sqlx; `memory` keeps everything in
//! process and is what the test suite runs against.

pub mod maintenance_task_repository;
pub mod memory;
pub mod vehicle_repository;

use async_trait::async_trait;

use crate::filters::FilterSet;
use crate::models::{
    MaintenanceTask, MaintenanceTaskPatch, NewMaintenanceTask, NewVehicle, Vehicle, VehiclePatch,
};
use crate::utils::errors::AppResult;

pub use maintenance_task_repository::PgMaintenanceTaskRepository;
pub use memory::InMemoryStore;
pub use vehicle_repository::PgVehicleRepository;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Vehicles matching every predicate, ordered by id
    async fn list(&self, filters: &FilterSet) -> AppResult<Vec<Vehicle>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>>;

    async fn exists(&self, id: i64) -> AppResult<bool>;

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;

    /// Applies the patch; `None` when the id is unknown.
    async fn update(&self, id: i64, patch: VehiclePatch) -> AppResult<Option<Vehicle>>;

    /// Removes the vehicle and its tasks; `false` when the id is unknown.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait MaintenanceTaskRepository: Send + Sync {
    /// Tasks matching every predicate (including predicates on the owning
    /// vehicle), ordered by id
    async fn list(&self, filters: &FilterSet) -> AppResult<Vec<MaintenanceTask>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MaintenanceTask>>;

    async fn create(&self, task: NewMaintenanceTask) -> AppResult<MaintenanceTask>;

    async fn update(&self, id: i64, patch: MaintenanceTaskPatch) -> AppResult<Option<MaintenanceTask>>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}
