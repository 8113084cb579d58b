// ABOUTME: Task storage layer using SQLite
// ABOUTME: Officer task assignment, status stamping and the overdue sweep

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::types::{Task, TaskCreateInput, TaskStatus, TaskUpdateInput};
use crate::common::{optional_json_column, NamedRef};
use crate::StorageError;

const TASK_SELECT: &str = "SELECT t.*, w.name AS ward_name, \
     t.assigned_to AS assignee_id, a.name AS assignee_name, \
     t.assigned_by AS assigner_id, b.name AS assigner_name \
     FROM tasks t \
     LEFT JOIN wards w ON w.id = t.ward_id \
     LEFT JOIN users a ON a.id = t.assigned_to \
     LEFT JOIN users b ON b.id = t.assigned_by";

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a task in status `new`
    pub async fn create_task(
        &self,
        input: TaskCreateInput,
        assigned_by: &str,
    ) -> Result<Task, StorageError> {
        let task_id = airwatch_core::generate_id("task");
        let now = Utc::now();

        debug!(
            "Creating task: {} (ward: {}, assignee: {})",
            task_id, input.ward, input.assigned_to
        );

        sqlx::query(
            r#"
            INSERT INTO tasks (id, report_id, title, description, ward_id, assigned_to, assigned_by,
                               status, priority, deadline, notes, action_details, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task_id)
        .bind(&input.report)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.ward)
        .bind(&input.assigned_to)
        .bind(assigned_by)
        .bind(TaskStatus::New)
        .bind(input.priority.unwrap_or_default())
        .bind(input.deadline)
        .bind(&input.notes)
        .bind(input.action_details.as_ref().map(Json))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_task(&task_id).await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task, StorageError> {
        debug!("Fetching task: {}", task_id);

        let row = sqlx::query(&format!("{} WHERE t.id = ?", TASK_SELECT))
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Task"))?;

        row_to_task(&row)
    }

    /// Page of tasks, newest first, with the total matching count
    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Task>, i64), StorageError> {
        debug!(
            "Fetching tasks (status: {:?}, limit: {}, offset: {})",
            status, limit, offset
        );

        let mut count_builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM tasks t");
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_SELECT);
        if let Some(status) = status {
            count_builder.push(" WHERE t.status = ").push_bind(status);
            query_builder.push(" WHERE t.status = ").push_bind(status);
        }
        query_builder
            .push(" ORDER BY t.created_at DESC, t.rowid DESC LIMIT ")
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

        let tasks = rows.iter().map(row_to_task).collect::<Result<Vec<_>, _>>()?;
        Ok((tasks, total))
    }

    /// Tasks in a ward, newest first
    pub async fn list_for_ward(
        &self,
        ward_id: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StorageError> {
        self.list_where("t.ward_id", ward_id, status).await
    }

    /// Tasks assigned to an officer, newest first
    pub async fn list_for_assignee(
        &self,
        user_id: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StorageError> {
        self.list_where("t.assigned_to", user_id, status).await
    }

    async fn list_where(
        &self,
        column: &'static str,
        value: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StorageError> {
        debug!("Fetching tasks where {} = {} (status: {:?})", column, value, status);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_SELECT);
        query_builder
            .push(format!(" WHERE {} = ", column))
            .push_bind(value);
        if let Some(status) = status {
            query_builder.push(" AND t.status = ").push_bind(status);
        }
        query_builder.push(" ORDER BY t.created_at DESC, t.rowid DESC");

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_task).collect()
    }

    /// Overwrite supplied fields. `in_progress` stamps `startDate` once,
    /// `completed` stamps `completionDate`.
    pub async fn update_task(
        &self,
        task_id: &str,
        input: TaskUpdateInput,
    ) -> Result<Task, StorageError> {
        debug!("Updating task: {}", task_id);

        let now = Utc::now();
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET updated_at = ");
        query_builder.push_bind(now);

        if let Some(status) = input.status {
            query_builder.push(", status = ").push_bind(status);
            match status {
                TaskStatus::InProgress => {
                    query_builder
                        .push(", start_date = COALESCE(start_date, ")
                        .push_bind(now)
                        .push(")");
                }
                TaskStatus::Completed => {
                    query_builder.push(", completion_date = ").push_bind(now);
                }
                _ => {}
            }
        }
        if let Some(priority) = input.priority {
            query_builder.push(", priority = ").push_bind(priority);
        }
        if let Some(notes) = input.notes {
            query_builder.push(", notes = ").push_bind(notes);
        }
        if let Some(deadline) = input.deadline {
            query_builder.push(", deadline = ").push_bind(deadline);
        }
        query_builder.push(" WHERE id = ").push_bind(task_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Task"));
        }

        self.get_task(task_id).await
    }

    /// Flag every open task past its deadline as `overdue`. Returns the number changed.
    pub async fn mark_overdue(&self) -> Result<u64, StorageError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = 'overdue', updated_at = ?
            WHERE deadline IS NOT NULL AND deadline < ? AND status IN ('new', 'in_progress')
            "#,
        )
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let changed = result.rows_affected();
        if changed > 0 {
            info!("Marked {} tasks overdue", changed);
        }
        Ok(changed)
    }
}

fn row_to_task(row: &SqliteRow) -> Result<Task, StorageError> {
    let ward = NamedRef::from_row(row, "ward")?
        .ok_or_else(|| StorageError::Database("task row without ward".to_string()))?;
    let assigned_to = NamedRef::from_row(row, "assignee")?
        .ok_or_else(|| StorageError::Database("task row without assignee".to_string()))?;

    Ok(Task {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        report: row.try_get("report_id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        ward,
        assigned_to,
        assigned_by: NamedRef::from_row(row, "assigner")?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        priority: row.try_get("priority").map_err(StorageError::Sqlx)?,
        deadline: row.try_get("deadline").map_err(StorageError::Sqlx)?,
        start_date: row.try_get("start_date").map_err(StorageError::Sqlx)?,
        completion_date: row.try_get("completion_date").map_err(StorageError::Sqlx)?,
        notes: row.try_get("notes").map_err(StorageError::Sqlx)?,
        action_details: optional_json_column(row, "action_details")?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
