pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use enrollsync_core::errors::EnrollError;
use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Wraps a driver error for functions that report domain errors.
pub(crate) fn db_error(err: sqlx::Error) -> EnrollError {
    EnrollError::Database(err.into())
}
