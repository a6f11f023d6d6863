//! Runs built queries against the connection pool.
//!
//! Thin wrappers over sqlx that bind the ordered parameter list and
//! distinguish result shapes: row sets, optional single rows, affected
//! counts, and scalar counts. Statements are logged at debug level.

use crate::error::AppError;
use crate::sql::builder::BuiltQuery;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};

pub async fn fetch_all(pool: &PgPool, q: &BuiltQuery) -> Result<Vec<PgRow>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn fetch_optional(pool: &PgPool, q: &BuiltQuery) -> Result<Option<PgRow>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_optional(pool).await?)
}

/// Run a statement and return the affected-row count.
pub async fn execute(pool: &PgPool, q: &BuiltQuery) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(pool).await?.rows_affected())
}

/// Fetch a single BIGINT scalar, e.g. the `total` of a COUNT query.
pub async fn fetch_scalar_i64(pool: &PgPool, q: &BuiltQuery) -> Result<i64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    let row = query.fetch_one(pool).await?;
    Ok(row.try_get(0)?)
}

pub async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    Ok(pool.begin().await?)
}

pub async fn fetch_optional_tx(
    conn: &mut PgConnection,
    q: &BuiltQuery,
) -> Result<Option<PgRow>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_optional(&mut *conn).await?)
}

pub async fn execute_tx(conn: &mut PgConnection, q: &BuiltQuery) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(&mut *conn).await?.rows_affected())
}
