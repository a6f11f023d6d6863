//! Connection-pool lifecycle and table bootstrap.
//!
//! The pool is constructed once at startup, verified with a round-trip, and
//! passed by reference into the repositories. Shutdown drains and closes it.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Build the bounded pool and verify connectivity with `SELECT 1`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_pool_size)
        .max_connections(config.max_pool_size)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(config.connect_options())
        .await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!(
        host = %config.host,
        database = %config.database,
        max_pool_size = config.max_pool_size,
        "database connection established"
    );
    Ok(pool)
}

/// Idempotent bootstrap DDL for the resource tables. Not a migration
/// system: existing tables are left untouched.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS public.menu (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            calories INTEGER NOT NULL,
            price NUMERIC NOT NULL,
            ingredients TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS public.rental_contract (
            id UUID PRIMARY KEY,
            tenant_id UUID NOT NULL,
            room_id UUID NOT NULL,
            contract_number TEXT NOT NULL,
            monthly_rent NUMERIC NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            status TEXT NOT NULL,
            notes TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn check_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Drain and close the pool. In-flight statements finish first.
pub async fn shutdown(pool: &PgPool) {
    pool.close().await;
    tracing::info!("database pool closed");
}
