// ABOUTME: HTTP request handlers for citizen pollution reports
// ABOUTME: Submission, moderation, assignment and comment threads

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::{require_non_empty, validate_coordinates};
use airwatch_core::{PaginatedResponse, PaginationParams};
use airwatch_storage::reports::{
    Report, ReportAssignInput, ReportCreateInput, ReportStatus, ReportStatusInput,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ok_with_message, ApiResponse};

const DEFAULT_PENDING_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
}

pub async fn create_report(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<ReportCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Report>>)> {
    require_non_empty("ward", &input.ward)?;
    require_non_empty("title", &input.title)?;
    if let Some([longitude, latitude]) = input.location {
        validate_coordinates(longitude, latitude)?;
    }

    info!("User {} reporting {:?} in ward {}", user.id(), input.pollution_type, input.ward);

    let report = db.report_storage.create_report(input, user.id()).await?;
    Ok(created(report, "Report submitted successfully"))
}

pub async fn get_report(
    State(db): State<DbState>,
    _user: CurrentUser,
    Path(report_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Report>>> {
    Ok(ok(db.report_storage.get_report(&report_id).await?))
}

pub async fn list_my_reports(
    State(db): State<DbState>,
    user: CurrentUser,
    Query(filter): Query<ReportFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Report>>>> {
    let (reports, total) = db
        .report_storage
        .list_for_citizen(user.id(), filter.status, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::paginated(PaginatedResponse::new(
        reports,
        &pagination,
        total,
    ))))
}

pub async fn list_ward_reports(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(ward_id): Path<String>,
    Query(filter): Query<ReportFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Report>>>> {
    user.require_role(STAFF)?;
    info!(
        "Listing reports for ward {} (status: {:?}, page: {})",
        ward_id,
        filter.status,
        pagination.page()
    );

    let (reports, total) = db
        .report_storage
        .list_for_ward(&ward_id, filter.status, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::paginated(PaginatedResponse::new(
        reports,
        &pagination,
        total,
    ))))
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub limit: Option<i64>,
}

/// Moderation queue
pub async fn list_pending_reports(
    State(db): State<DbState>,
    user: CurrentUser,
    Query(query): Query<PendingQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Report>>>> {
    user.require_role(STAFF)?;
    let limit = query.limit.unwrap_or(DEFAULT_PENDING_LIMIT).clamp(1, 100);

    Ok(ok(db.report_storage.list_pending(limit).await?))
}

pub async fn update_report_status(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(report_id): Path<String>,
    Json(input): Json<ReportStatusInput>,
) -> ApiResult<Json<ApiResponse<Report>>> {
    user.require_role(STAFF)?;
    info!("Setting report {} to {:?}", report_id, input.status);

    let report = db.report_storage.update_status(&report_id, input).await?;
    Ok(ok_with_message(report, "Report status updated successfully"))
}

pub async fn assign_report(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(report_id): Path<String>,
    Json(input): Json<ReportAssignInput>,
) -> ApiResult<Json<ApiResponse<Report>>> {
    user.require_role(STAFF)?;
    require_non_empty("assignedTo", &input.assigned_to)?;

    info!("Assigning report {} to {}", report_id, input.assigned_to);

    let report = db.report_storage.assign(&report_id, input).await?;
    Ok(ok_with_message(report, "Report assigned successfully"))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

pub async fn add_comment(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(report_id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Report>>)> {
    require_non_empty("comment", &request.comment)?;

    let report = db
        .report_storage
        .add_comment(&report_id, &user.0.id, &user.0.name, request.comment.trim())
        .await?;
    Ok(created(report, "Comment added successfully"))
}
