// ABOUTME: HTTP request handlers for broadcast operations
// ABOUTME: Immediate and scheduled citizen broadcasts plus delivery bookkeeping

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::require_non_empty;
use airwatch_core::{PaginatedResponse, PaginationParams};
use airwatch_storage::broadcasts::{
    Broadcast, BroadcastCreateInput, BroadcastStatus, BroadcastUpdateInput,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ok_with_message, ApiResponse};

pub async fn create_broadcast(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<BroadcastCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Broadcast>>)> {
    user.require_role(STAFF)?;
    require_non_empty("message", &input.message)?;

    info!(
        "Creating broadcast for {} wards (scheduled: {:?})",
        input.wards.len(),
        input.scheduled_for
    );

    let broadcast = db
        .broadcast_storage
        .create_broadcast(input, user.id())
        .await?;
    Ok(created(broadcast, "Broadcast created successfully"))
}

#[derive(Debug, Deserialize)]
pub struct BroadcastFilter {
    pub status: Option<BroadcastStatus>,
}

pub async fn list_broadcasts(
    State(db): State<DbState>,
    user: CurrentUser,
    Query(filter): Query<BroadcastFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Broadcast>>>> {
    user.require_role(STAFF)?;
    info!(
        "Listing broadcasts (status: {:?}, page: {})",
        filter.status,
        pagination.page()
    );

    let (broadcasts, total) = db
        .broadcast_storage
        .list_broadcasts(filter.status, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::paginated(PaginatedResponse::new(
        broadcasts,
        &pagination,
        total,
    ))))
}

pub async fn get_broadcast(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(broadcast_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Broadcast>>> {
    user.require_role(STAFF)?;
    Ok(ok(db.broadcast_storage.get_broadcast(&broadcast_id).await?))
}

pub async fn list_ward_broadcasts(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Broadcast>>>> {
    info!("Listing broadcasts for ward {}", ward_id);
    Ok(ok(db.broadcast_storage.list_for_ward(&ward_id).await?))
}

pub async fn update_broadcast(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(broadcast_id): Path<String>,
    Json(input): Json<BroadcastUpdateInput>,
) -> ApiResult<Json<ApiResponse<Broadcast>>> {
    user.require_role(STAFF)?;
    info!("Updating broadcast {} (status: {:?})", broadcast_id, input.status);

    let broadcast = db
        .broadcast_storage
        .update_broadcast(&broadcast_id, input)
        .await?;
    Ok(ok_with_message(broadcast, "Broadcast updated successfully"))
}
