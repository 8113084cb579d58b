// ABOUTME: Shared record fragments and row helpers used by every storage module
// ABOUTME: Reference display subsets, pollutant and channel sub-documents, error mapping

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteExecutor};
use std::collections::HashMap;

use crate::StorageError;

/// A reference resolved to its display name through a LEFT JOIN.
/// `name` is null when the referenced record no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: Option<String>,
}

impl NamedRef {
    /// Read `<prefix>_id` and `<prefix>_name` columns from a joined row
    pub(crate) fn from_row(row: &SqliteRow, prefix: &str) -> Result<Option<Self>, StorageError> {
        let id: Option<String> = row
            .try_get(format!("{}_id", prefix).as_str())
            .map_err(StorageError::Sqlx)?;
        let name: Option<String> = row
            .try_get(format!("{}_name", prefix).as_str())
            .map_err(StorageError::Sqlx)?;

        Ok(id.map(|id| NamedRef { id, name }))
    }
}

/// Pollutant concentrations attached to wards and readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
}

/// Delivery channel flags for alerts and broadcasts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channels {
    pub sms: bool,
    pub push: bool,
    pub email: bool,
    pub website: bool,
}

/// Decode a JSON text column into `T`
pub(crate) fn json_column<T>(row: &SqliteRow, column: &str) -> Result<T, StorageError>
where
    T: serde::de::DeserializeOwned,
{
    let Json(value): Json<T> = row.try_get(column).map_err(StorageError::Sqlx)?;
    Ok(value)
}

/// Decode a nullable JSON text column into `Option<T>`
pub(crate) fn optional_json_column<T>(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<T>, StorageError>
where
    T: serde::de::DeserializeOwned,
{
    let value: Option<Json<T>> = row.try_get(column).map_err(StorageError::Sqlx)?;
    Ok(value.map(|Json(v)| v))
}

/// Resolve the ward lists of several owner records from a `<owner>_wards` join table.
/// `table` and `owner_column` are fixed identifiers, never user input.
pub(crate) async fn load_ward_refs<'e, E>(
    executor: E,
    table: &'static str,
    owner_column: &'static str,
    owner_ids: &[String],
) -> Result<HashMap<String, Vec<NamedRef>>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let mut refs: HashMap<String, Vec<NamedRef>> = HashMap::new();
    if owner_ids.is_empty() {
        return Ok(refs);
    }

    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT j.{owner} AS owner_id, j.ward_id AS ward_id, w.name AS ward_name \
         FROM {table} j LEFT JOIN wards w ON w.id = j.ward_id WHERE j.{owner} IN (",
        owner = owner_column,
        table = table
    ));
    let mut separated = query_builder.separated(", ");
    for id in owner_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(") ORDER BY j.position");

    let rows = query_builder
        .build()
        .fetch_all(executor)
        .await
        .map_err(StorageError::Sqlx)?;

    for row in &rows {
        let owner_id: String = row.try_get("owner_id").map_err(StorageError::Sqlx)?;
        if let Some(ward) = NamedRef::from_row(row, "ward")? {
            refs.entry(owner_id).or_default().push(ward);
        }
    }

    Ok(refs)
}

/// Map a write error, turning SQLite UNIQUE violations into `Duplicate`
pub(crate) fn map_write_err(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
            if code == "2067" || code == "1555" {
                let message = db_err.message();
                let column = message
                    .rsplit_once('.')
                    .map(|(_, col)| col.to_string())
                    .unwrap_or_else(|| message.to_string());
                return StorageError::Duplicate(column);
            }
        }
    }
    StorageError::Sqlx(err)
}
