use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::dto::vehicle_dto::{parse_create_vehicle, parse_update_vehicle};
use crate::filters::{FilterSet, VEHICLE_FILTERS};
use crate::models::Vehicle;
use crate::repositories::VehicleRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct VehicleController {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.vehicles.clone(),
        }
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> AppResult<Vec<Vehicle>> {
        info!("Fetching all vehicles");
        let filters = FilterSet::from_query(VEHICLE_FILTERS, params);
        let vehicles = self.repository.list(&filters).await?;
        info!("{} vehicles retrieved", vehicles.len());
        Ok(vehicles)
    }

    pub async fn create(&self, payload: &Value) -> AppResult<Vehicle> {
        info!("Creating a new vehicle");
        let new_vehicle = parse_create_vehicle(payload).map_err(|errors| {
            warn!("Vehicle creation failed: {}", errors);
            AppError::Validation(errors)
        })?;

        let vehicle = self.repository.create(new_vehicle).await?;
        info!("Vehicle {} created successfully", vehicle.id);
        Ok(vehicle)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Vehicle> {
        info!("Fetching vehicle with ID: {}", id);
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    /// The body is only looked at once the record is known to exist, so an
    /// unknown id is a 404 even when the payload is also unusable.
    pub async fn update(&self, id: i64, payload: AppResult<Value>) -> AppResult<Vehicle> {
        info!("Updating vehicle with ID: {}", id);
        self.get_by_id(id).await?;

        let patch = parse_update_vehicle(&payload?).map_err(|errors| {
            warn!("Vehicle update failed: {}", errors);
            AppError::Validation(errors)
        })?;

        let vehicle = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
        info!("Vehicle with ID {} updated successfully", id);
        Ok(vehicle)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        info!("Deleting vehicle with ID: {}", id);
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        info!("Vehicle with ID {} deleted successfully", id);
        Ok(())
    }
}
