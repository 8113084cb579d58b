// ABOUTME: Broadcast storage layer using SQLite
// ABOUTME: Immediate or scheduled broadcasts, ward feeds, and delivery counter updates

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::types::{Broadcast, BroadcastCreateInput, BroadcastStatus, BroadcastUpdateInput};
use crate::common::{json_column, load_ward_refs, NamedRef};
use crate::StorageError;

const BROADCAST_SELECT: &str = "SELECT b.*, b.created_by AS creator_id, u.name AS creator_name \
     FROM broadcasts b LEFT JOIN users u ON u.id = b.created_by";

const WARD_FEED_LIMIT: i64 = 20;

pub struct BroadcastStorage {
    pool: SqlitePool,
}

impl BroadcastStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a broadcast. With `scheduledFor` it is stored as `scheduled` and unsent;
    /// otherwise it is marked `sent` immediately with `scheduledFor = sentAt = now`.
    pub async fn create_broadcast(
        &self,
        input: BroadcastCreateInput,
        created_by: &str,
    ) -> Result<Broadcast, StorageError> {
        let broadcast_id = airwatch_core::generate_id("bcast");
        let now = Utc::now();

        let (status, scheduled_for, sent_at) = match input.scheduled_for {
            Some(at) => (BroadcastStatus::Scheduled, at, None),
            None => (BroadcastStatus::Sent, now, Some(now)),
        };

        debug!("Creating broadcast: {} (status: {:?})", broadcast_id, status);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO broadcasts (id, title, message, broadcast_type, broadcast_to, channels,
                                    sent_at, scheduled_for, status, created_by, recipient_count,
                                    success_count, failure_count, attachments, priority,
                                    created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, 0, ?, ?, ?, ?)
            "#,
        )
        .bind(&broadcast_id)
        .bind(&input.title)
        .bind(&input.message)
        .bind(input.broadcast_type.unwrap_or_default())
        .bind(Json(&input.broadcast_to))
        .bind(Json(input.channels))
        .bind(sent_at)
        .bind(scheduled_for)
        .bind(status)
        .bind(created_by)
        .bind(Json(&input.attachments))
        .bind(input.priority.unwrap_or_default())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        for (position, ward_id) in input.wards.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO broadcast_wards (broadcast_id, ward_id, position) VALUES (?, ?, ?)",
            )
            .bind(&broadcast_id)
            .bind(ward_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!("Broadcast {} created as {:?}", broadcast_id, status);

        self.get_broadcast(&broadcast_id).await
    }

    pub async fn get_broadcast(&self, broadcast_id: &str) -> Result<Broadcast, StorageError> {
        let row = sqlx::query(&format!("{} WHERE b.id = ?", BROADCAST_SELECT))
            .bind(broadcast_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Broadcast"))?;

        let mut broadcasts = self.hydrate(vec![row]).await?;
        broadcasts.pop().ok_or(StorageError::NotFound("Broadcast"))
    }

    /// Page of broadcasts, newest first, with the total matching count
    pub async fn list_broadcasts(
        &self,
        status: Option<BroadcastStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Broadcast>, i64), StorageError> {
        debug!(
            "Fetching broadcasts (status: {:?}, limit: {}, offset: {})",
            status, limit, offset
        );

        let mut count_builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM broadcasts b");
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(BROADCAST_SELECT);
        if let Some(status) = status {
            count_builder.push(" WHERE b.status = ").push_bind(status);
            query_builder.push(" WHERE b.status = ").push_bind(status);
        }
        query_builder
            .push(" ORDER BY b.created_at DESC, b.rowid DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok((self.hydrate(rows).await?, total))
    }

    /// Sent and scheduled broadcasts targeting a ward, most recently sent first
    pub async fn list_for_ward(&self, ward_id: &str) -> Result<Vec<Broadcast>, StorageError> {
        debug!("Fetching broadcasts for ward: {}", ward_id);

        let rows = sqlx::query(&format!(
            "{} WHERE b.status IN ('sent', 'scheduled') \
             AND EXISTS (SELECT 1 FROM broadcast_wards bw WHERE bw.broadcast_id = b.id AND bw.ward_id = ?) \
             ORDER BY b.sent_at DESC, b.rowid DESC LIMIT ?",
            BROADCAST_SELECT
        ))
        .bind(ward_id)
        .bind(WARD_FEED_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.hydrate(rows).await
    }

    /// Update status and delivery counters. Moving to `sent` stamps `sentAt`.
    pub async fn update_broadcast(
        &self,
        broadcast_id: &str,
        input: BroadcastUpdateInput,
    ) -> Result<Broadcast, StorageError> {
        debug!("Updating broadcast: {}", broadcast_id);

        let now = Utc::now();
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE broadcasts SET updated_at = ");
        query_builder.push_bind(now);

        if let Some(status) = input.status {
            query_builder.push(", status = ").push_bind(status);
            if status == BroadcastStatus::Sent {
                query_builder.push(", sent_at = ").push_bind(now);
            }
        }
        if let Some(count) = input.success_count {
            query_builder.push(", success_count = ").push_bind(count);
        }
        if let Some(count) = input.failure_count {
            query_builder.push(", failure_count = ").push_bind(count);
        }
        if let Some(count) = input.recipient_count {
            query_builder.push(", recipient_count = ").push_bind(count);
        }
        query_builder.push(" WHERE id = ").push_bind(broadcast_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Broadcast"));
        }

        self.get_broadcast(broadcast_id).await
    }

    async fn hydrate(&self, rows: Vec<SqliteRow>) -> Result<Vec<Broadcast>, StorageError> {
        let mut broadcasts = rows
            .iter()
            .map(row_to_broadcast)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<String> = broadcasts.iter().map(|b| b.id.clone()).collect();
        let mut wards = load_ward_refs(&self.pool, "broadcast_wards", "broadcast_id", &ids).await?;

        for broadcast in &mut broadcasts {
            broadcast.wards = wards.remove(&broadcast.id).unwrap_or_default();
        }

        Ok(broadcasts)
    }
}

fn row_to_broadcast(row: &SqliteRow) -> Result<Broadcast, StorageError> {
    Ok(Broadcast {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        message: row.try_get("message").map_err(StorageError::Sqlx)?,
        broadcast_type: row.try_get("broadcast_type").map_err(StorageError::Sqlx)?,
        wards: Vec::new(),
        broadcast_to: json_column(row, "broadcast_to")?,
        channels: json_column(row, "channels")?,
        sent_at: row.try_get("sent_at").map_err(StorageError::Sqlx)?,
        scheduled_for: row.try_get("scheduled_for").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        created_by: NamedRef::from_row(row, "creator")?,
        recipient_count: row.try_get("recipient_count").map_err(StorageError::Sqlx)?,
        success_count: row.try_get("success_count").map_err(StorageError::Sqlx)?,
        failure_count: row.try_get("failure_count").map_err(StorageError::Sqlx)?,
        attachments: json_column(row, "attachments")?,
        priority: row.try_get("priority").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
