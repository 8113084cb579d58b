// ABOUTME: HTTP request handlers for officer task operations
// ABOUTME: Assignment, listings, progress updates and the overdue sweep

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use airwatch_core::validation::require_non_empty;
use airwatch_core::{PaginatedResponse, PaginationParams};
use airwatch_storage::tasks::{Task, TaskCreateInput, TaskStatus, TaskUpdateInput};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ok_with_message, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
}

pub async fn create_task(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<TaskCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Task>>)> {
    user.require_role(STAFF)?;
    require_non_empty("ward", &input.ward)?;
    require_non_empty("assignedTo", &input.assigned_to)?;

    info!("Assigning task in ward {} to {}", input.ward, input.assigned_to);

    let task = db.task_storage.create_task(input, user.id()).await?;
    Ok(created(task, "Task created successfully"))
}

pub async fn list_tasks(
    State(db): State<DbState>,
    user: CurrentUser,
    Query(filter): Query<TaskFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    user.require_role(STAFF)?;
    info!(
        "Listing tasks (status: {:?}, page: {})",
        filter.status,
        pagination.page()
    );

    let (tasks, total) = db
        .task_storage
        .list_tasks(filter.status, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::paginated(PaginatedResponse::new(
        tasks,
        &pagination,
        total,
    ))))
}

/// Tasks assigned to the caller
pub async fn list_my_tasks(
    State(db): State<DbState>,
    user: CurrentUser,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    info!("Listing tasks for {}", user.id());
    Ok(ok(db
        .task_storage
        .list_for_assignee(user.id(), filter.status)
        .await?))
}

pub async fn list_ward_tasks(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(ward_id): Path<String>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    user.require_role(STAFF)?;
    Ok(ok(db
        .task_storage
        .list_for_ward(&ward_id, filter.status)
        .await?))
}

pub async fn get_task(
    State(db): State<DbState>,
    _user: CurrentUser,
    Path(task_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    Ok(ok(db.task_storage.get_task(&task_id).await?))
}

pub async fn update_task(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
    Json(input): Json<TaskUpdateInput>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    user.require_role(STAFF)?;
    info!("Updating task {} (status: {:?})", task_id, input.status);

    let task = db.task_storage.update_task(&task_id, input).await?;
    Ok(ok_with_message(task, "Task updated successfully"))
}

#[derive(Debug, Serialize)]
pub struct OverdueSweep {
    pub updated: u64,
}

pub async fn mark_overdue(
    State(db): State<DbState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<OverdueSweep>>> {
    user.require_role(STAFF)?;

    let updated = db.task_storage.mark_overdue().await?;
    info!("Overdue sweep flagged {} tasks", updated);

    Ok(ok_with_message(
        OverdueSweep { updated },
        "Overdue tasks updated",
    ))
}
