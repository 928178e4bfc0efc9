//! PostgreSQL persistence for the curation core.
//!
//! Repositories are zero-sized structs with async functions taking `&PgPool`;
//! [`PgLockStore`] and [`PgVersionFamilyStore`] wrap a pool and adapt them to
//! the store traits the managers consume.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
mod stores;

pub use stores::{PgLockStore, PgVersionFamilyStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
