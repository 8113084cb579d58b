// ABOUTME: HTTP request handlers for the reward catalogue and redemptions
// ABOUTME: Citizens spend green points here; admins maintain the catalogue

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::require_non_empty;
use airwatch_storage::rewards::{
    RedemptionUpdateInput, Reward, RewardCategory, RewardCreateInput, UserReward,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, ADMIN_ONLY};
use super::error::{ApiError, ApiResult};
use super::response::{created, ok, ok_with_message, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct RewardFilter {
    pub category: Option<RewardCategory>,
}

pub async fn list_rewards(
    State(db): State<DbState>,
    Query(filter): Query<RewardFilter>,
) -> ApiResult<Json<ApiResponse<Vec<Reward>>>> {
    info!("Listing rewards (category: {:?})", filter.category);
    Ok(ok(db.reward_storage.list_available(filter.category).await?))
}

pub async fn get_reward(
    State(db): State<DbState>,
    Path(reward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Reward>>> {
    Ok(ok(db.reward_storage.get_reward(&reward_id).await?))
}

pub async fn create_reward(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<RewardCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Reward>>)> {
    user.require_role(ADMIN_ONLY)?;
    require_non_empty("title", &input.title)?;

    info!("Creating reward '{}' ({} points)", input.title, input.points_required);

    let reward = db.reward_storage.create_reward(input, user.id()).await?;
    Ok(created(reward, "Reward created successfully"))
}

pub async fn redeem_reward(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(reward_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserReward>>)> {
    info!("User {} redeeming reward {}", user.id(), reward_id);

    let redemption = db.reward_storage.redeem(&reward_id, user.id()).await?;
    Ok(created(redemption, "Reward redeemed successfully"))
}

pub async fn list_my_redemptions(
    State(db): State<DbState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<UserReward>>>> {
    Ok(ok(db.reward_storage.list_for_user(user.id()).await?))
}

/// Owner or admin may mark a voucher used or expired
pub async fn update_redemption(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(redemption_id): Path<String>,
    Json(input): Json<RedemptionUpdateInput>,
) -> ApiResult<Json<ApiResponse<UserReward>>> {
    let redemption = db.reward_storage.get_redemption(&redemption_id).await?;
    if !user.is_admin() && redemption.user.as_deref() != Some(user.id()) {
        return Err(ApiError::forbidden());
    }

    info!("Setting redemption {} to {:?}", redemption_id, input.status);

    let redemption = db
        .reward_storage
        .update_redemption_status(&redemption_id, input.status)
        .await?;
    Ok(ok_with_message(redemption, "Redemption updated successfully"))
}
