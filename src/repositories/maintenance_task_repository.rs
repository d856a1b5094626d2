use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::MaintenanceTaskRepository;
use crate::filters::FilterSet;
use crate::models::{MaintenanceTask, MaintenanceTaskPatch, NewMaintenanceTask};
use crate::utils::errors::{AppError, AppResult, FieldErrors};
use crate::utils::validation::does_not_exist;

const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PgMaintenanceTaskRepository {
    pool: PgPool,
}

impl PgMaintenanceTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The vehicle can disappear between the existence check and the write; the
/// foreign key catches that and it is reported like any other bad reference.
fn map_write_error(e: sqlx::Error, vehicle: Option<i64>, action: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let mut errors = FieldErrors::new();
            let message = match vehicle {
                Some(id) => does_not_exist(id),
                None => "Referenced vehicle does not exist.".to_string(),
            };
            errors.add("vehicle", message);
            return AppError::Validation(errors);
        }
    }
    AppError::Internal(format!("Error {} maintenance task: {}", action, e))
}

/// Tasks joined with their vehicle so filters can reach `v.*` columns.
fn list_query(filters: &FilterSet) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT t.id, t.vehicle_id, t.task_type, t.status \
         FROM maintenance_tasks t JOIN vehicles v ON v.id = t.vehicle_id",
    );
    filters.push_where(&mut builder);
    builder.push(" ORDER BY t.id");
    builder
}

#[async_trait]
impl MaintenanceTaskRepository for PgMaintenanceTaskRepository {
    async fn list(&self, filters: &FilterSet) -> AppResult<Vec<MaintenanceTask>> {
        let mut builder = list_query(filters);
        let tasks = builder
            .build_query_as::<MaintenanceTask>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error listing maintenance tasks: {}", e)))?;

        Ok(tasks)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<MaintenanceTask>> {
        let task = sqlx::query_as::<_, MaintenanceTask>(
            "SELECT id, vehicle_id, task_type, status FROM maintenance_tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, task: NewMaintenanceTask) -> AppResult<MaintenanceTask> {
        let vehicle = task.vehicle;
        let task = sqlx::query_as::<_, MaintenanceTask>(
            r#"
            INSERT INTO maintenance_tasks (vehicle_id, task_type, status)
            VALUES ($1, $2, $3)
            RETURNING id, vehicle_id, task_type, status
            "#,
        )
        .bind(task.vehicle)
        .bind(task.task_type)
        .bind(task.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(vehicle), "creating"))?;

        Ok(task)
    }

    async fn update(&self, id: i64, patch: MaintenanceTaskPatch) -> AppResult<Option<MaintenanceTask>> {
        let vehicle = patch.vehicle;
        let task = sqlx::query_as::<_, MaintenanceTask>(
            r#"
            UPDATE maintenance_tasks
            SET vehicle_id = COALESCE($2, vehicle_id),
                task_type = COALESCE($3, task_type),
                status = COALESCE($4, status)
            WHERE id = $1
            RETURNING id, vehicle_id, task_type, status
            "#,
        )
        .bind(id)
        .bind(patch.vehicle)
        .bind(patch.task_type)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, vehicle, "updating"))?;

        Ok(task)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM maintenance_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Error deleting maintenance task: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
