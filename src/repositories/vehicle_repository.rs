use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::VehicleRepository;
use crate::filters::FilterSet;
use crate::models::{NewVehicle, Vehicle, VehiclePatch};
use crate::utils::errors::{AppError, AppResult};

const VEHICLE_COLUMNS: &str = "v.id, v.registration_number, v.make, v.model, v.year";

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn list(&self, filters: &FilterSet) -> AppResult<Vec<Vehicle>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM vehicles v",
            VEHICLE_COLUMNS
        ));
        filters.push_where(&mut builder);
        builder.push(" ORDER BY v.id");

        let vehicles = builder
            .build_query_as::<Vehicle>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error listing vehicles: {}", e)))?;

        Ok(vehicles)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles v WHERE v.id = $1",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error checking vehicle: {}", e)))?;

        Ok(result.0)
    }

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (registration_number, make, model, year)
            VALUES ($1, $2, $3, $4)
            RETURNING id, registration_number, make, model, year
            "#,
        )
        .bind(vehicle.registration_number)
        .bind(vehicle.make)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Error creating vehicle: {}", e)))?;

        Ok(vehicle)
    }

    async fn update(&self, id: i64, patch: VehiclePatch) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET registration_number = COALESCE($2, registration_number),
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                year = COALESCE($5, year)
            WHERE id = $1
            RETURNING id, registration_number, make, model, year
            "#,
        )
        .bind(id)
        .bind(patch.registration_number)
        .bind(patch.make)
        .bind(patch.model)
        .bind(patch.year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Error updating vehicle: {}", e)))?;

        Ok(vehicle)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        // maintenance_tasks.vehicle_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error deleting vehicle: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
