// ABOUTME: HTTP request handlers for user accounts
// ABOUTME: Citizen signup, admin account creation, profile edits and token rotation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use airwatch_core::validation::{require_non_empty, validate_email};
use airwatch_storage::users::{
    ProfileUpdateInput, RegisterInput, User, UserCreateInput, UserRole, UserWithToken,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, ADMIN_ONLY, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ok_with_message, ApiResponse};

/// Public signup. Always creates a citizen; the token appears only in this response
pub async fn register(
    State(db): State<DbState>,
    Json(input): Json<RegisterInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserWithToken>>)> {
    require_non_empty("name", &input.name)?;
    validate_email(&input.email)?;

    let ward = match input.ward_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(db.ward_storage.get_ward_by_name(name).await?),
        _ => None,
    };

    info!("Registering citizen {}", input.email);

    let created_user = db
        .user_storage
        .create_user(UserCreateInput {
            name: input.name,
            email: input.email,
            role: Some(UserRole::Citizen),
            ward: ward.as_ref().map(|w| w.id.clone()),
            ward_name: ward.map(|w| w.name),
            employee_id: None,
            phone_number: input.phone_number,
        })
        .await?;
    Ok(created(created_user, "User registered successfully"))
}

/// The plaintext token appears only in this response
pub async fn create_user(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<UserCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserWithToken>>)> {
    user.require_role(ADMIN_ONLY)?;
    require_non_empty("name", &input.name)?;
    validate_email(&input.email)?;

    info!("Creating {} account for {}", input.role.unwrap_or_default(), input.email);

    let created_user = db.user_storage.create_user(input).await?;
    Ok(created(created_user, "User created successfully"))
}

pub async fn get_current_user(user: CurrentUser) -> ApiResult<Json<ApiResponse<User>>> {
    Ok(ok(user.0))
}

pub async fn update_current_user(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<ProfileUpdateInput>,
) -> ApiResult<Json<ApiResponse<User>>> {
    if let Some(name) = &input.name {
        require_non_empty("name", name)?;
    }

    let updated = db.user_storage.update_profile(user.id(), input).await?;
    Ok(ok_with_message(updated, "Profile updated successfully"))
}

/// Issues a fresh token; the one used for this request stops working
pub async fn rotate_current_token(
    State(db): State<DbState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<UserWithToken>>> {
    info!("Rotating API token for {}", user.id());

    let rotated = db.user_storage.rotate_token(user.id()).await?;
    Ok(ok_with_message(rotated, "API token rotated"))
}

pub async fn get_user(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    user.require_role(STAFF)?;
    Ok(ok(db.user_storage.get_user(&user_id).await?))
}
