// ABOUTME: HTTP request handlers for AQI readings
// ABOUTME: Recording, current value, history, city overview, daily trends and badge lookup

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use airwatch_core::validation::{require_non_empty, require_non_negative};
use airwatch_core::BadgeLevel;
use airwatch_storage::aqi::{
    AqiReading, CityAqi, DailyTrend, HistoryInterval, ReadingCreateInput, MAX_TREND_DAYS,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::{ApiError, ApiResult};
use super::response::{created, ok, ApiResponse};

const DEFAULT_TREND_DAYS: i64 = 7;

pub async fn record_reading(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<ReadingCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AqiReading>>)> {
    user.require_role(STAFF)?;
    require_non_empty("ward", &input.ward)?;
    require_non_negative("aqi", input.aqi)?;

    info!("Recording AQI {} for ward {}", input.aqi, input.ward);

    let reading = db.aqi_storage.record_reading(input).await?;
    Ok(created(reading, "AQI data recorded successfully"))
}

pub async fn current_for_ward(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<AqiReading>>> {
    info!("Getting current AQI for ward {}", ward_id);
    Ok(ok(db.aqi_storage.latest_for_ward(&ward_id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interval: HistoryInterval,
}

impl HistoryQuery {
    /// Explicit bounds win; a missing start falls back to the interval window
    fn bounds(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
        let end = self.end_date.unwrap_or(now);
        let start = match self.start_date {
            Some(start) => start,
            None => end
                .checked_sub_signed(self.interval.window())
                .ok_or_else(|| ApiError::validation("endDate is out of range"))?,
        };
        Ok((start, end))
    }
}

pub async fn history(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AqiReading>>>> {
    let (start, end) = query.bounds(Utc::now())?;
    if start > end {
        return Err(ApiError::validation("startDate must not be after endDate"));
    }

    info!("Getting AQI history for ward {} ({} to {})", ward_id, start, end);

    Ok(ok(db.aqi_storage.history(&ward_id, start, end).await?))
}

pub async fn city_overview(State(db): State<DbState>) -> ApiResult<Json<ApiResponse<CityAqi>>> {
    info!("Getting city AQI overview");
    Ok(ok(db.aqi_storage.city_overview().await?))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
}

pub async fn trends(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Json<ApiResponse<Vec<DailyTrend>>>> {
    let days = query
        .days
        .unwrap_or(DEFAULT_TREND_DAYS)
        .clamp(1, MAX_TREND_DAYS);
    info!("Getting {}-day AQI trends for ward {}", days, ward_id);

    Ok(ok(db.aqi_storage.daily_trends(&ward_id, days).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub aqi: f64,
    pub level: &'static str,
    pub class_name: &'static str,
    pub color: &'static str,
}

impl From<f64> for Badge {
    fn from(aqi: f64) -> Self {
        let level = BadgeLevel::from_aqi(aqi);
        Badge {
            aqi,
            level: level.label(),
            class_name: level.class_name(),
            color: level.color(),
        }
    }
}

/// Four-band label for map markers and badges
pub async fn badge(Path(value): Path<f64>) -> ApiResult<Json<ApiResponse<Badge>>> {
    require_non_negative("aqi", value)?;
    Ok(ok(Badge::from(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[case(50.0, "Good")]
    #[case(51.0, "Moderate")]
    #[case(100.0, "Moderate")]
    #[case(101.0, "Unhealthy")]
    #[case(150.0, "Unhealthy")]
    #[case(151.0, "Hazardous")]
    fn test_badge_bands(#[case] aqi: f64, #[case] expected: &str) {
        assert_eq!(Badge::from(aqi).level, expected);
    }

    #[test]
    fn test_history_defaults_to_interval_window() {
        let now = Utc::now();
        let query = HistoryQuery {
            start_date: None,
            end_date: None,
            interval: HistoryInterval::Daily,
        };
        let (start, end) = query.bounds(now).unwrap();
        assert_eq!(end, now);
        assert_eq!(end - start, Duration::days(30));
    }

    #[test]
    fn test_history_explicit_bounds() {
        let now = Utc::now();
        let start = now - Duration::days(2);
        let query = HistoryQuery {
            start_date: Some(start),
            end_date: None,
            interval: HistoryInterval::Hourly,
        };
        assert_eq!(query.bounds(now).unwrap(), (start, now));
    }

    #[test]
    fn test_history_default_start_out_of_range() {
        let query = HistoryQuery {
            start_date: None,
            end_date: Some(DateTime::<Utc>::MIN_UTC),
            interval: HistoryInterval::Hourly,
        };
        assert!(matches!(query.bounds(Utc::now()), Err(ApiError::Validation(_))));
    }
}
