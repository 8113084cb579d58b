// ABOUTME: Citizen report storage layer using SQLite
// ABOUTME: Submission, moderation queues, assignment, comments and green point awards

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::types::{
    Report, ReportAssignInput, ReportComment, ReportCreateInput, ReportStatus, ReportStatusInput,
};
use crate::common::{json_column, NamedRef};
use crate::StorageError;

const REPORT_SELECT: &str = "SELECT r.*, c.name AS citizen_name, \
     r.ward_id AS wardref_id, w.name AS wardref_name, \
     r.assigned_to AS assignee_id, a.name AS assignee_name \
     FROM reports r \
     LEFT JOIN users c ON c.id = r.citizen_id \
     LEFT JOIN wards w ON w.id = r.ward_id \
     LEFT JOIN users a ON a.id = r.assigned_to";

pub struct ReportStorage {
    pool: SqlitePool,
}

impl ReportStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// File a report as `pending` and bump the citizen's submission count
    pub async fn create_report(
        &self,
        input: ReportCreateInput,
        citizen_id: &str,
    ) -> Result<Report, StorageError> {
        let report_id = airwatch_core::generate_id("report");
        let now = Utc::now();

        debug!("Creating report: {} (ward: {})", report_id, input.ward);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let ward_name: Option<String> = sqlx::query_scalar("SELECT name FROM wards WHERE id = ?")
            .bind(&input.ward)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        let ward_name = ward_name.ok_or(StorageError::NotFound("Ward"))?;

        let (longitude, latitude) = match input.location {
            Some([lon, lat]) => (Some(lon), Some(lat)),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO reports (id, citizen_id, ward_id, ward_name, title, description,
                                 pollution_type, severity, photos, videos, longitude, latitude,
                                 address, timestamp, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report_id)
        .bind(citizen_id)
        .bind(&input.ward)
        .bind(&ward_name)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.pollution_type)
        .bind(input.severity.unwrap_or_default())
        .bind(Json(&input.photos))
        .bind(Json(&input.videos))
        .bind(longitude)
        .bind(latitude)
        .bind(&input.address)
        .bind(now)
        .bind(ReportStatus::Pending)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        sqlx::query(
            "UPDATE users SET reports_submitted = reports_submitted + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(citizen_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_report(&report_id).await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Report, StorageError> {
        debug!("Fetching report: {}", report_id);

        let row = sqlx::query(&format!("{} WHERE r.id = ?", REPORT_SELECT))
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Report"))?;

        row_to_report(&row)
    }

    /// A citizen's reports, newest first, with the total matching count
    pub async fn list_for_citizen(
        &self,
        citizen_id: &str,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Report>, i64), StorageError> {
        self.list_page("r.citizen_id", citizen_id, status, limit, offset)
            .await
    }

    /// Reports in a ward, newest first, with the total matching count
    pub async fn list_for_ward(
        &self,
        ward_id: &str,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Report>, i64), StorageError> {
        self.list_page("r.ward_id", ward_id, status, limit, offset)
            .await
    }

    async fn list_page(
        &self,
        column: &'static str,
        value: &str,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Report>, i64), StorageError> {
        debug!(
            "Fetching reports where {} = {} (status: {:?}, limit: {}, offset: {})",
            column, value, status, limit, offset
        );

        let mut count_builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM reports r");
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(REPORT_SELECT);
        for builder in [&mut count_builder, &mut query_builder] {
            builder.push(format!(" WHERE {} = ", column)).push_bind(value);
            if let Some(status) = status {
                builder.push(" AND r.status = ").push_bind(status);
            }
        }
        query_builder
            .push(" ORDER BY r.created_at DESC, r.rowid DESC LIMIT ")
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

        let reports = rows.iter().map(row_to_report).collect::<Result<Vec<_>, _>>()?;
        Ok((reports, total))
    }

    /// Moderation queue: pending and verified reports, newest first
    pub async fn list_pending(&self, limit: i64) -> Result<Vec<Report>, StorageError> {
        let rows = sqlx::query(&format!(
            "{} WHERE r.status IN ('pending', 'verified') ORDER BY r.created_at DESC, r.rowid DESC LIMIT ?",
            REPORT_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_report).collect()
    }

    /// Set a report's status. `resolved` stamps `resolvedDate` and records the action;
    /// `verified` with points credits them to the citizen in the same transaction.
    pub async fn update_status(
        &self,
        report_id: &str,
        input: ReportStatusInput,
    ) -> Result<Report, StorageError> {
        let now = Utc::now();
        let points = input.green_points_awarded.unwrap_or(0);
        if points < 0 {
            return Err(StorageError::Invalid(
                "greenPointsAwarded must not be negative".to_string(),
            ));
        }

        debug!("Updating report {} to {:?}", report_id, input.status);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let citizen_id: Option<Option<String>> =
            sqlx::query_scalar("SELECT citizen_id FROM reports WHERE id = ?")
                .bind(report_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        let citizen_id = citizen_id.ok_or(StorageError::NotFound("Report"))?;

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE reports SET updated_at = ");
        query_builder.push_bind(now);
        query_builder.push(", status = ").push_bind(input.status);
        if input.status == ReportStatus::Resolved {
            query_builder.push(", resolved_date = ").push_bind(now);
            query_builder.push(", action_taken = ").push_bind(input.action_taken.clone());
        }
        if input.green_points_awarded.is_some() {
            query_builder.push(", green_points_awarded = ").push_bind(points);
        }
        query_builder.push(" WHERE id = ").push_bind(report_id);

        query_builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        if input.status == ReportStatus::Verified && points > 0 {
            if let Some(citizen_id) = &citizen_id {
                sqlx::query(
                    "UPDATE users SET green_points = green_points + ?, updated_at = ? WHERE id = ?",
                )
                .bind(points)
                .bind(now)
                .bind(citizen_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;

                info!("Awarded {} green points to {} for report {}", points, citizen_id, report_id);
            }
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_report(report_id).await
    }

    /// Assign a report to an officer
    pub async fn assign(
        &self,
        report_id: &str,
        input: ReportAssignInput,
    ) -> Result<Report, StorageError> {
        debug!("Assigning report {} to {}", report_id, input.assigned_to);

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET assigned_to = ?, due_date = ?, status = ?, assigned_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.assigned_to)
        .bind(input.due_date)
        .bind(ReportStatus::Assigned)
        .bind(now)
        .bind(now)
        .bind(report_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Report"));
        }

        self.get_report(report_id).await
    }

    /// Append a comment to the report's thread
    pub async fn add_comment(
        &self,
        report_id: &str,
        user_id: &str,
        user_name: &str,
        comment: &str,
    ) -> Result<Report, StorageError> {
        let now = Utc::now();
        let entry = ReportComment {
            id: airwatch_core::generate_id("comment"),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            comment: comment.to_string(),
            timestamp: now,
        };

        let result = sqlx::query(
            "UPDATE reports SET comments = json_insert(comments, '$[#]', json(?)), updated_at = ? WHERE id = ?",
        )
        .bind(Json(&entry))
        .bind(now)
        .bind(report_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Report"));
        }

        self.get_report(report_id).await
    }
}

fn row_to_report(row: &SqliteRow) -> Result<Report, StorageError> {
    let longitude: Option<f64> = row.try_get("longitude").map_err(StorageError::Sqlx)?;
    let latitude: Option<f64> = row.try_get("latitude").map_err(StorageError::Sqlx)?;
    let ward = NamedRef::from_row(row, "wardref")?
        .ok_or_else(|| StorageError::Database("report row without ward".to_string()))?;

    Ok(Report {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        citizen: NamedRef::from_row(row, "citizen")?,
        ward,
        ward_name: row.try_get("ward_name").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        pollution_type: row.try_get("pollution_type").map_err(StorageError::Sqlx)?,
        severity: row.try_get("severity").map_err(StorageError::Sqlx)?,
        photos: json_column(row, "photos")?,
        videos: json_column(row, "videos")?,
        location: longitude.zip(latitude).map(|(lon, lat)| [lon, lat]),
        address: row.try_get("address").map_err(StorageError::Sqlx)?,
        timestamp: row.try_get("timestamp").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        assigned_to: NamedRef::from_row(row, "assignee")?,
        assigned_date: row.try_get("assigned_date").map_err(StorageError::Sqlx)?,
        due_date: row.try_get("due_date").map_err(StorageError::Sqlx)?,
        action_taken: row.try_get("action_taken").map_err(StorageError::Sqlx)?,
        resolved_date: row.try_get("resolved_date").map_err(StorageError::Sqlx)?,
        green_points_awarded: row.try_get("green_points_awarded").map_err(StorageError::Sqlx)?,
        comments: json_column(row, "comments")?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
