// ABOUTME: AirWatch persistence layer over SQLite
// ABOUTME: One module per record type, each with types and a storage struct

use thiserror::Error;

pub mod alerts;
pub mod aqi;
pub mod broadcasts;
pub mod common;
pub mod db;
pub mod health;
pub mod policies;
pub mod reports;
pub mod rewards;
pub mod tasks;
pub mod users;
pub mod wards;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use common::{Channels, NamedRef, Pollutants};
pub use db::DbState;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Carries the entity name, e.g. `NotFound("Ward")`
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Duplicate value: {0}")]
    Duplicate(String),
    #[error("{0}")]
    Invalid(String),
}
