// ABOUTME: HTTP request handlers for ward operations
// ABOUTME: Listing, lookup, admin maintenance, map markers, radius search and AQI windows

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::{require_non_empty, validate_coordinates};
use airwatch_storage::aqi::{WardAqiWindow, MAX_WINDOW_HOURS};
use airwatch_storage::wards::{NearbyWard, Ward, WardCreateInput, WardMapEntry, WardUpdateInput};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, ADMIN_ONLY};
use super::error::{ApiError, ApiResult};
use super::response::{created, ok, ok_with_message, ApiResponse};

/// Default search radius in metres
const DEFAULT_NEARBY_DISTANCE_M: f64 = 5000.0;

const DEFAULT_WINDOW_HOURS: i64 = 24;

pub async fn list_wards(State(db): State<DbState>) -> ApiResult<Json<ApiResponse<Vec<Ward>>>> {
    info!("Listing wards");
    Ok(ok(db.ward_storage.list_wards().await?))
}

pub async fn get_ward(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Ward>>> {
    info!("Getting ward: {}", ward_id);
    Ok(ok(db.ward_storage.get_ward(&ward_id).await?))
}

pub async fn get_ward_by_name(
    State(db): State<DbState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<Ward>>> {
    info!("Getting ward by name: {}", name);
    Ok(ok(db.ward_storage.get_ward_by_name(&name).await?))
}

pub async fn create_ward(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<WardCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Ward>>)> {
    user.require_role(ADMIN_ONLY)?;
    require_non_empty("name", &input.name)?;
    require_non_empty("code", &input.code)?;
    if let Some([longitude, latitude]) = input.coordinates {
        validate_coordinates(longitude, latitude)?;
    }

    info!("Creating ward: {}", input.name);

    let ward = db.ward_storage.create_ward(input).await?;
    Ok(created(ward, "Ward created successfully"))
}

pub async fn update_ward(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(ward_id): Path<String>,
    Json(input): Json<WardUpdateInput>,
) -> ApiResult<Json<ApiResponse<Ward>>> {
    user.require_role(ADMIN_ONLY)?;
    if let Some([longitude, latitude]) = input.coordinates {
        validate_coordinates(longitude, latitude)?;
    }

    info!("Updating ward: {}", ward_id);

    let ward = db.ward_storage.update_ward(&ward_id, input).await?;
    Ok(ok_with_message(ward, "Ward updated successfully"))
}

pub async fn ward_map(State(db): State<DbState>) -> ApiResult<Json<ApiResponse<Vec<WardMapEntry>>>> {
    Ok(ok(db.ward_storage.map_entries().await?))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Metres
    pub distance: Option<f64>,
}

pub async fn nearby_wards(
    State(db): State<DbState>,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<Json<ApiResponse<Vec<NearbyWard>>>> {
    let (Some(longitude), Some(latitude)) = (query.longitude, query.latitude) else {
        return Err(ApiError::validation("Coordinates are required"));
    };
    validate_coordinates(longitude, latitude)?;

    let distance = query.distance.unwrap_or(DEFAULT_NEARBY_DISTANCE_M);
    if distance < 0.0 {
        return Err(ApiError::validation("distance must not be negative"));
    }

    info!(
        "Finding wards within {}m of ({}, {})",
        distance, longitude, latitude
    );

    Ok(ok(db
        .ward_storage
        .find_nearby(longitude, latitude, distance)
        .await?))
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub hours: Option<i64>,
}

/// Readings for the last `hours`, oldest first
pub async fn ward_aqi(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<ApiResponse<WardAqiWindow>>> {
    let hours = query
        .hours
        .unwrap_or(DEFAULT_WINDOW_HOURS)
        .clamp(1, MAX_WINDOW_HOURS);
    info!("Getting {}h AQI window for ward {}", hours, ward_id);

    Ok(ok(db.aqi_storage.ward_window(&ward_id, hours).await?))
}
