// ABOUTME: Health impact storage layer using SQLite
// ABOUTME: Records ward snapshots and serves latest, city-wide and trend views

use airwatch_core::AqiLevel;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::types::{
    CityHealthOverview, CityHealthTotals, HealthImpact, HealthImpactCreateInput,
    HealthTrendPoint, WardHealthAdvice, WardHealthSummary, WardRiskZones,
};
use crate::aqi::MAX_TREND_DAYS;
use crate::common::{json_column, optional_json_column};
use crate::StorageError;

/// Cap on wards included in the city overview
const CITY_OVERVIEW_LIMIT: i64 = 100;

pub struct HealthStorage {
    pool: SqlitePool,
}

impl HealthStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a snapshot for an existing ward. Missing `currentAQI`/`aqiLevel`
    /// are taken from the ward's current reading.
    pub async fn record(&self, input: HealthImpactCreateInput) -> Result<HealthImpact, StorageError> {
        let ward_row = sqlx::query("SELECT name, current_aqi FROM wards WHERE id = ?")
            .bind(&input.ward)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Ward"))?;
        let ward_name: String = ward_row.try_get("name").map_err(StorageError::Sqlx)?;
        let ward_aqi: f64 = ward_row.try_get("current_aqi").map_err(StorageError::Sqlx)?;

        let id = airwatch_core::generate_id("health");
        let now = Utc::now();
        let current_aqi = input.current_aqi.unwrap_or(ward_aqi);
        let aqi_level = input
            .aqi_level
            .unwrap_or_else(|| AqiLevel::from_aqi(current_aqi));

        debug!("Recording health impact for ward {}", input.ward);

        sqlx::query(
            r#"
            INSERT INTO health_impacts (id, ward_id, ward_name, date, aqi_level, current_aqi,
                                        respiratory_cases, hospital_admissions, affected_population,
                                        risk_zones, heatwave_data, recommendations, preventive_measures,
                                        outbreak_risk, mortality_estimates, trend,
                                        recorded_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.ward)
        .bind(&ward_name)
        .bind(input.date.unwrap_or(now))
        .bind(aqi_level)
        .bind(current_aqi)
        .bind(Json(input.respiratory_cases.unwrap_or_default()))
        .bind(Json(input.hospital_admissions.unwrap_or_default()))
        .bind(Json(input.affected_population.unwrap_or_default()))
        .bind(Json(input.risk_zones.unwrap_or_default()))
        .bind(input.heatwave_data.map(Json))
        .bind(Json(input.recommendations.unwrap_or_default()))
        .bind(Json(input.preventive_measures.unwrap_or_default()))
        .bind(input.outbreak_risk)
        .bind(Json(input.mortality_estimates.unwrap_or_default()))
        .bind(Json(input.trend.unwrap_or_default()))
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        info!("Recorded health impact {} for ward {}", id, ward_name);

        self.get(&id).await
    }

    pub async fn get(&self, id: &str) -> Result<HealthImpact, StorageError> {
        let row = sqlx::query("SELECT * FROM health_impacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Health impact data"))?;

        row_to_impact(&row)
    }

    /// Most recent snapshot for a ward
    pub async fn latest_for_ward(&self, ward_id: &str) -> Result<HealthImpact, StorageError> {
        debug!("Fetching latest health impact for ward: {}", ward_id);

        let row = sqlx::query(
            "SELECT * FROM health_impacts WHERE ward_id = ? ORDER BY date DESC, rowid DESC LIMIT 1",
        )
        .bind(ward_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?
        .ok_or(StorageError::NotFound("Health impact data"))?;

        row_to_impact(&row)
    }

    pub async fn risk_zones(&self, ward_id: &str) -> Result<WardRiskZones, StorageError> {
        let impact = self
            .latest_for_ward(ward_id)
            .await
            .map_err(|e| rename_not_found(e, "Risk zone data"))?;

        Ok(WardRiskZones {
            ward: impact.ward_name,
            risk_zones: impact.risk_zones,
        })
    }

    pub async fn advice(&self, ward_id: &str) -> Result<WardHealthAdvice, StorageError> {
        let impact = self
            .latest_for_ward(ward_id)
            .await
            .map_err(|e| rename_not_found(e, "Recommendations"))?;

        Ok(WardHealthAdvice {
            ward: impact.ward_name,
            recommendations: impact.recommendations,
            preventive_measures: impact.preventive_measures,
            outbreak_risk: impact.outbreak_risk,
        })
    }

    /// Latest snapshot of each ward (newest first, at most 100) with city totals
    pub async fn city_overview(&self) -> Result<CityHealthOverview, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT h.* FROM health_impacts h
            WHERE h.rowid = (
                SELECT h2.rowid FROM health_impacts h2
                WHERE h2.ward_id = h.ward_id
                ORDER BY h2.date DESC, h2.rowid DESC
                LIMIT 1
            )
            ORDER BY h.date DESC
            LIMIT ?
            "#,
        )
        .bind(CITY_OVERVIEW_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let ward_data = rows
            .iter()
            .map(|row| row_to_impact(row).map(WardHealthSummary::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CityHealthOverview {
            city_overview: CityHealthTotals::from_summaries(&ward_data),
            ward_data,
        })
    }

    /// Snapshots from the last `days` days (1..=365), oldest first
    pub async fn trends(&self, ward_id: &str, days: i64) -> Result<Vec<HealthTrendPoint>, StorageError> {
        let days = days.clamp(1, MAX_TREND_DAYS);
        let since = Utc::now() - Duration::days(days);

        debug!("Fetching {}-day health trends for ward {}", days, ward_id);

        let rows = sqlx::query(
            r#"
            SELECT date, current_aqi, respiratory_cases, hospital_admissions
            FROM health_impacts
            WHERE ward_id = ? AND date >= ?
            ORDER BY date ASC, rowid ASC
            "#,
        )
        .bind(ward_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(HealthTrendPoint {
                    date: row.try_get("date").map_err(StorageError::Sqlx)?,
                    current_aqi: row.try_get("current_aqi").map_err(StorageError::Sqlx)?,
                    respiratory_cases: json_column(row, "respiratory_cases")?,
                    hospital_admissions: json_column(row, "hospital_admissions")?,
                })
            })
            .collect()
    }
}

fn rename_not_found(err: StorageError, entity: &'static str) -> StorageError {
    match err {
        StorageError::NotFound(_) => StorageError::NotFound(entity),
        other => other,
    }
}

fn row_to_impact(row: &sqlx::sqlite::SqliteRow) -> Result<HealthImpact, StorageError> {
    Ok(HealthImpact {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        ward: row.try_get("ward_id").map_err(StorageError::Sqlx)?,
        ward_name: row.try_get("ward_name").map_err(StorageError::Sqlx)?,
        date: row.try_get("date").map_err(StorageError::Sqlx)?,
        aqi_level: row.try_get("aqi_level").map_err(StorageError::Sqlx)?,
        current_aqi: row.try_get("current_aqi").map_err(StorageError::Sqlx)?,
        respiratory_cases: json_column(row, "respiratory_cases")?,
        hospital_admissions: json_column(row, "hospital_admissions")?,
        affected_population: json_column(row, "affected_population")?,
        risk_zones: json_column(row, "risk_zones")?,
        heatwave_data: optional_json_column(row, "heatwave_data")?,
        recommendations: json_column(row, "recommendations")?,
        preventive_measures: json_column(row, "preventive_measures")?,
        outbreak_risk: row.try_get("outbreak_risk").map_err(StorageError::Sqlx)?,
        mortality_estimates: json_column(row, "mortality_estimates")?,
        trend: json_column(row, "trend")?,
        recorded_at: row.try_get("recorded_at").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
