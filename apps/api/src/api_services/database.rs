use std::time::Duration;

use rolegate_core::{AppError, AppResult};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

static ROLE_STORE_MIGRATOR: Migrator = sqlx::migrate!("../../crates/infrastructure/migrations");

/// Opens the role store pool and brings its schema up to date.
pub async fn open_role_store(database_url: &str) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("role store is unreachable: {error}")))?;

    ROLE_STORE_MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("role store migration failed: {error}")))?;
    info!(
        migrations = ROLE_STORE_MIGRATOR.iter().count(),
        "role store schema is current"
    );

    Ok(pool)
}
