// ABOUTME: HTTP request handlers for ward health impact data
// ABOUTME: Recording snapshots, latest per ward, city totals, risk zones, advice and trends

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::{require_non_empty, require_non_negative};
use airwatch_storage::aqi::MAX_TREND_DAYS;
use airwatch_storage::health::{
    CityHealthOverview, HealthImpact, HealthImpactCreateInput, HealthTrendPoint,
    WardHealthAdvice, WardRiskZones,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ApiResponse};

const DEFAULT_HEALTH_TREND_DAYS: i64 = 30;

pub async fn record_health_impact(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<HealthImpactCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HealthImpact>>)> {
    user.require_role(STAFF)?;
    require_non_empty("ward", &input.ward)?;
    if let Some(aqi) = input.current_aqi {
        require_non_negative("currentAQI", aqi)?;
    }

    info!("Recording health impact for ward {}", input.ward);

    let impact = db.health_storage.record(input).await?;
    Ok(created(impact, "Health impact data recorded successfully"))
}

pub async fn ward_health_impact(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<HealthImpact>>> {
    Ok(ok(db.health_storage.latest_for_ward(&ward_id).await?))
}

pub async fn city_health_overview(
    State(db): State<DbState>,
) -> ApiResult<Json<ApiResponse<CityHealthOverview>>> {
    info!("Getting city health overview");
    Ok(ok(db.health_storage.city_overview().await?))
}

pub async fn ward_risk_zones(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<WardRiskZones>>> {
    Ok(ok(db.health_storage.risk_zones(&ward_id).await?))
}

pub async fn ward_health_advice(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<WardHealthAdvice>>> {
    Ok(ok(db.health_storage.advice(&ward_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct HealthTrendQuery {
    pub days: Option<i64>,
}

pub async fn ward_health_trends(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
    Query(query): Query<HealthTrendQuery>,
) -> ApiResult<Json<ApiResponse<Vec<HealthTrendPoint>>>> {
    let days = query
        .days
        .unwrap_or(DEFAULT_HEALTH_TREND_DAYS)
        .clamp(1, MAX_TREND_DAYS);
    info!("Getting {}-day health trends for ward {}", days, ward_id);

    Ok(ok(db.health_storage.trends(&ward_id, days).await?))
}
