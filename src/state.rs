//! Shared application state
//!
//! Handed to every axum handler. The repositories are the only shared
//! mutable resource; handlers hold no other state between requests.

use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    InMemoryStore, MaintenanceTaskRepository, PgMaintenanceTaskRepository, PgVehicleRepository,
    VehicleRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub tasks: Arc<dyn MaintenanceTaskRepository>,
}

impl AppState {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        tasks: Arc<dyn MaintenanceTaskRepository>,
    ) -> Self {
        Self { vehicles, tasks }
    }

    /// State backed by Postgres
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgMaintenanceTaskRepository::new(pool)),
        )
    }

    /// State backed by a fresh in-process store
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self::new(Arc::new(store.clone()), Arc::new(store))
    }
}
