use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the results database.
///
/// This function reads the `DATABASE_URL` from the environment (seeding it
/// from a `.env` file when one is present), creates a connection pool with
/// robust settings, and returns it. The pool can be shared across the whole
/// application.
pub async fn connect() -> Result<PgPool, DbError> {
    // A missing .env file is fine as long as DATABASE_URL is set some other way.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::Config("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    Ok(pool)
}
