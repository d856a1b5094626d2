//! Postgres connection and schema bootstrap

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::models::maintenance_task::{STATUS_MAX_LENGTH, TASK_TYPE_MAX_LENGTH};
use crate::models::vehicle::{MAKE_MAX_LENGTH, MODEL_MAX_LENGTH, REGISTRATION_NUMBER_MAX_LENGTH};

/// Opens the pool and makes sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database {}", mask_database_url(&config.url));
    let pool = config.create_pool().await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Idempotent DDL for both tables.
pub fn schema_statements() -> Vec<String> {
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS vehicles (
                id BIGSERIAL PRIMARY KEY,
                registration_number VARCHAR({}) NOT NULL,
                make VARCHAR({}) NOT NULL,
                model VARCHAR({}) NOT NULL,
                year INTEGER NOT NULL
            )
            "#,
            REGISTRATION_NUMBER_MAX_LENGTH, MAKE_MAX_LENGTH, MODEL_MAX_LENGTH
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS maintenance_tasks (
                id BIGSERIAL PRIMARY KEY,
                vehicle_id BIGINT NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
                task_type VARCHAR({}) NOT NULL,
                status VARCHAR({}) NOT NULL
            )
            "#,
            TASK_TYPE_MAX_LENGTH, STATUS_MAX_LENGTH
        ),
        "CREATE INDEX IF NOT EXISTS maintenance_tasks_vehicle_id_idx ON maintenance_tasks (vehicle_id)"
            .to_string(),
    ]
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in schema_statements() {
        sqlx::query(&statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

/// Hides credentials before a URL is logged.
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    if at_pos < scheme_end {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
}
