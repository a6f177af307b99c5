use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection is not configured: {0}")]
    Config(String),

    #[error("Database request failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("The results database contains an invalid record: {0}")]
    InvalidRecord(#[from] CoreError),
}
