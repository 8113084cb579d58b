// ABOUTME: Alert storage layer using SQLite
// ABOUTME: Alerts with their target wards kept in the alert_wards join table

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::types::{Alert, AlertCreateInput, AlertStatus, AlertUpdateInput};
use crate::common::{json_column, load_ward_refs, NamedRef};
use crate::StorageError;

const ALERT_SELECT: &str = "SELECT a.*, a.created_by AS creator_id, u.name AS creator_name \
     FROM alerts a LEFT JOIN users u ON u.id = a.created_by";

/// Cap on the per-ward alert feed
const WARD_FEED_LIMIT: i64 = 20;

pub struct AlertStorage {
    pool: SqlitePool,
}

impl AlertStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an alert. Status always starts as `active`.
    pub async fn create_alert(
        &self,
        input: AlertCreateInput,
        created_by: &str,
    ) -> Result<Alert, StorageError> {
        let alert_id = airwatch_core::generate_id("alert");
        let now = Utc::now();

        debug!("Creating alert: {} ({} wards)", alert_id, input.wards.len());

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO alerts (id, title, description, alert_type, severity, target_groups,
                                recommendations, health_impact, status, created_by, sent_via,
                                start_time, end_time, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&alert_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.alert_type)
        .bind(input.severity.unwrap_or_default())
        .bind(Json(&input.target_groups))
        .bind(Json(&input.recommendations))
        .bind(&input.health_impact)
        .bind(AlertStatus::Active)
        .bind(created_by)
        .bind(Json(input.sent_via))
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        for (position, ward_id) in input.wards.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO alert_wards (alert_id, ward_id, position) VALUES (?, ?, ?)",
            )
            .bind(&alert_id)
            .bind(ward_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_alert(&alert_id).await
    }

    pub async fn get_alert(&self, alert_id: &str) -> Result<Alert, StorageError> {
        debug!("Fetching alert: {}", alert_id);

        let row = sqlx::query(&format!("{} WHERE a.id = ?", ALERT_SELECT))
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Alert"))?;

        let mut alerts = self.hydrate(vec![row]).await?;
        alerts.pop().ok_or(StorageError::NotFound("Alert"))
    }

    /// Active alerts, newest first, optionally restricted to one ward
    pub async fn list_active(&self, ward_id: Option<&str>) -> Result<Vec<Alert>, StorageError> {
        debug!("Fetching active alerts (ward: {:?})", ward_id);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(ALERT_SELECT);
        query_builder.push(" WHERE a.status = ").push_bind(AlertStatus::Active);
        if let Some(ward_id) = ward_id {
            query_builder
                .push(" AND EXISTS (SELECT 1 FROM alert_wards aw WHERE aw.alert_id = a.id AND aw.ward_id = ")
                .push_bind(ward_id)
                .push(")");
        }
        query_builder.push(" ORDER BY a.created_at DESC, a.rowid DESC");

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.hydrate(rows).await
    }

    /// Active and resolved alerts targeting a ward, newest first
    pub async fn list_for_ward(&self, ward_id: &str) -> Result<Vec<Alert>, StorageError> {
        debug!("Fetching alerts for ward: {}", ward_id);

        let rows = sqlx::query(&format!(
            "{} WHERE a.status IN ('active', 'resolved') \
             AND EXISTS (SELECT 1 FROM alert_wards aw WHERE aw.alert_id = a.id AND aw.ward_id = ?) \
             ORDER BY a.created_at DESC, a.rowid DESC LIMIT ?",
            ALERT_SELECT
        ))
        .bind(ward_id)
        .bind(WARD_FEED_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.hydrate(rows).await
    }

    /// Overwrite status, description and recommendations when supplied
    pub async fn update_alert(
        &self,
        alert_id: &str,
        input: AlertUpdateInput,
    ) -> Result<Alert, StorageError> {
        debug!("Updating alert: {}", alert_id);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE alerts SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(status) = input.status {
            query_builder.push(", status = ").push_bind(status);
        }
        if let Some(description) = input.description {
            query_builder.push(", description = ").push_bind(description);
        }
        if let Some(recommendations) = input.recommendations {
            query_builder
                .push(", recommendations = ")
                .push_bind(Json(recommendations));
        }
        query_builder.push(" WHERE id = ").push_bind(alert_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Alert"));
        }

        self.get_alert(alert_id).await
    }

    pub async fn resolve_alert(&self, alert_id: &str) -> Result<Alert, StorageError> {
        self.update_alert(
            alert_id,
            AlertUpdateInput {
                status: Some(AlertStatus::Resolved),
                ..Default::default()
            },
        )
        .await
    }

    /// Attach ward refs to alert rows
    async fn hydrate(&self, rows: Vec<SqliteRow>) -> Result<Vec<Alert>, StorageError> {
        let mut alerts = rows
            .iter()
            .map(row_to_alert)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<String> = alerts.iter().map(|a| a.id.clone()).collect();
        let mut wards = load_ward_refs(&self.pool, "alert_wards", "alert_id", &ids).await?;

        for alert in &mut alerts {
            alert.wards = wards.remove(&alert.id).unwrap_or_default();
        }

        Ok(alerts)
    }
}

fn row_to_alert(row: &SqliteRow) -> Result<Alert, StorageError> {
    Ok(Alert {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        alert_type: row.try_get("alert_type").map_err(StorageError::Sqlx)?,
        severity: row.try_get("severity").map_err(StorageError::Sqlx)?,
        wards: Vec::new(),
        target_groups: json_column(row, "target_groups")?,
        recommendations: json_column(row, "recommendations")?,
        health_impact: row.try_get("health_impact").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        created_by: NamedRef::from_row(row, "creator")?,
        sent_via: json_column(row, "sent_via")?,
        start_time: row.try_get("start_time").map_err(StorageError::Sqlx)?,
        end_time: row.try_get("end_time").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
