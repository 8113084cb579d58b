// ABOUTME: AQI reading storage layer using SQLite
// ABOUTME: Records readings, keeps ward snapshots current, and serves history and trend queries

use airwatch_core::AqiLevel;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::types::{AqiReading, CityAqi, DailyTrend, ReadingCreateInput, WardAqiWindow};
use crate::common::{json_column, NamedRef};
use crate::StorageError;

/// Cap on readings returned by the recent-window query
const WARD_WINDOW_LIMIT: i64 = 100;

/// Longest look-back accepted by the trends query
pub const MAX_TREND_DAYS: i64 = 365;

/// Longest look-back accepted by the recent-window query
pub const MAX_WINDOW_HOURS: i64 = 24 * 365;

pub struct AqiStorage {
    pool: SqlitePool,
}

impl AqiStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a reading and refresh the ward's current snapshot in one transaction.
    /// A missing `aqiLevel` is derived from the value.
    pub async fn record_reading(&self, input: ReadingCreateInput) -> Result<AqiReading, StorageError> {
        let reading_id = airwatch_core::generate_id("aqi");
        let now = Utc::now();
        let timestamp = input.timestamp.unwrap_or(now);
        let aqi_level = input
            .aqi_level
            .unwrap_or_else(|| AqiLevel::from_aqi(input.aqi));
        let pollutants = input.pollutants.unwrap_or_default();

        debug!("Recording AQI {} for ward {}", input.aqi, input.ward);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let ward_name: Option<String> = sqlx::query_scalar("SELECT name FROM wards WHERE id = ?")
            .bind(&input.ward)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        let ward_name = ward_name.ok_or(StorageError::NotFound("Ward"))?;

        sqlx::query(
            r#"
            INSERT INTO aqi_readings (id, ward_id, ward_name, aqi, aqi_level, pollutants,
                                      temperature, humidity, wind_speed, wind_direction,
                                      visibility, uv_index, timestamp, source, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reading_id)
        .bind(&input.ward)
        .bind(&ward_name)
        .bind(input.aqi)
        .bind(aqi_level)
        .bind(Json(&pollutants))
        .bind(input.temperature)
        .bind(input.humidity)
        .bind(input.wind_speed)
        .bind(&input.wind_direction)
        .bind(input.visibility)
        .bind(input.uv_index)
        .bind(timestamp)
        .bind(input.source.unwrap_or_default())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            UPDATE wards
            SET current_aqi = ?, aqi_level = ?, pollutants = ?, last_updated = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(input.aqi)
        .bind(aqi_level)
        .bind(Json(&pollutants))
        .bind(now)
        .bind(now)
        .bind(&input.ward)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!(
            "Recorded AQI {} ({}) for ward {}",
            input.aqi, aqi_level, ward_name
        );

        self.get_reading(&reading_id).await
    }

    pub async fn get_reading(&self, reading_id: &str) -> Result<AqiReading, StorageError> {
        let row = sqlx::query("SELECT * FROM aqi_readings WHERE id = ?")
            .bind(reading_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("AQI data"))?;

        row_to_reading(&row)
    }

    /// Most recent reading for a ward
    pub async fn latest_for_ward(&self, ward_id: &str) -> Result<AqiReading, StorageError> {
        debug!("Fetching latest AQI for ward: {}", ward_id);

        let row = sqlx::query(
            "SELECT * FROM aqi_readings WHERE ward_id = ? ORDER BY timestamp DESC, rowid DESC LIMIT 1",
        )
        .bind(ward_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?
        .ok_or(StorageError::NotFound("AQI data"))?;

        row_to_reading(&row)
    }

    /// Readings for a ward between `start` and `end` inclusive, newest first
    pub async fn history(
        &self,
        ward_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AqiReading>, StorageError> {
        debug!("Fetching AQI history for ward {} ({} .. {})", ward_id, start, end);

        let rows = sqlx::query(
            r#"
            SELECT * FROM aqi_readings
            WHERE ward_id = ? AND timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp DESC, rowid DESC
            "#,
        )
        .bind(ward_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_reading).collect()
    }

    /// Latest reading of every ward, worst first, with the rounded average
    pub async fn city_overview(&self) -> Result<CityAqi, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT r.* FROM aqi_readings r
            WHERE r.rowid = (
                SELECT r2.rowid FROM aqi_readings r2
                WHERE r2.ward_id = r.ward_id
                ORDER BY r2.timestamp DESC, r2.rowid DESC
                LIMIT 1
            )
            ORDER BY r.aqi DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let wards = rows
            .iter()
            .map(row_to_reading)
            .collect::<Result<Vec<_>, _>>()?;

        let average_aqi = if wards.is_empty() {
            0.0
        } else {
            (wards.iter().map(|r| r.aqi).sum::<f64>() / wards.len() as f64).round()
        };

        Ok(CityAqi {
            average_aqi,
            aqi_level: AqiLevel::from_aqi(average_aqi),
            ward_count: wards.len(),
            wards,
        })
    }

    /// Per-day aggregates over the last `days` days (1..=365), oldest day first
    pub async fn daily_trends(&self, ward_id: &str, days: i64) -> Result<Vec<DailyTrend>, StorageError> {
        let days = days.clamp(1, MAX_TREND_DAYS);
        let since = Utc::now() - Duration::days(days);

        debug!("Computing {}-day AQI trends for ward {}", days, ward_id);

        let rows = sqlx::query(
            r#"
            SELECT substr(timestamp, 1, 10) AS day,
                   AVG(aqi) AS avg_aqi,
                   MAX(aqi) AS max_aqi,
                   MIN(aqi) AS min_aqi,
                   AVG(json_extract(pollutants, '$.pm25')) AS avg_pm25,
                   AVG(json_extract(pollutants, '$.pm10')) AS avg_pm10,
                   COUNT(*) AS readings
            FROM aqi_readings
            WHERE ward_id = ? AND timestamp >= ?
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(ward_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                let avg_pm25: Option<f64> = row.try_get("avg_pm25").map_err(StorageError::Sqlx)?;
                let avg_pm10: Option<f64> = row.try_get("avg_pm10").map_err(StorageError::Sqlx)?;
                Ok(DailyTrend {
                    date: row.try_get("day").map_err(StorageError::Sqlx)?,
                    avg_aqi: row
                        .try_get::<f64, _>("avg_aqi")
                        .map_err(StorageError::Sqlx)?
                        .round(),
                    max_aqi: row.try_get("max_aqi").map_err(StorageError::Sqlx)?,
                    min_aqi: row.try_get("min_aqi").map_err(StorageError::Sqlx)?,
                    avg_pm25: avg_pm25.map(round_tenth),
                    avg_pm10: avg_pm10.map(round_tenth),
                    readings: row.try_get("readings").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }

    /// The newest readings from the last `hours` hours, returned oldest first,
    /// with the ward's snapshot
    pub async fn ward_window(&self, ward_id: &str, hours: i64) -> Result<WardAqiWindow, StorageError> {
        let ward_row = sqlx::query("SELECT id, name, current_aqi, aqi_level FROM wards WHERE id = ?")
            .bind(ward_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Ward"))?;

        let since = Utc::now() - Duration::hours(hours.clamp(1, MAX_WINDOW_HOURS));

        let rows = sqlx::query(
            r#"
            SELECT * FROM aqi_readings
            WHERE ward_id = ? AND timestamp >= ?
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(ward_id)
        .bind(since)
        .bind(WARD_WINDOW_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(WardAqiWindow {
            ward: NamedRef {
                id: ward_row.try_get("id").map_err(StorageError::Sqlx)?,
                name: ward_row.try_get("name").map_err(StorageError::Sqlx)?,
            },
            current_aqi: ward_row.try_get("current_aqi").map_err(StorageError::Sqlx)?,
            aqi_level: ward_row.try_get("aqi_level").map_err(StorageError::Sqlx)?,
            data: rows
                .iter()
                .rev()
                .map(row_to_reading)
                .collect::<Result<_, _>>()?,
        })
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn row_to_reading(row: &sqlx::sqlite::SqliteRow) -> Result<AqiReading, StorageError> {
    Ok(AqiReading {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        ward: row.try_get("ward_id").map_err(StorageError::Sqlx)?,
        ward_name: row.try_get("ward_name").map_err(StorageError::Sqlx)?,
        aqi: row.try_get("aqi").map_err(StorageError::Sqlx)?,
        aqi_level: row.try_get("aqi_level").map_err(StorageError::Sqlx)?,
        pollutants: json_column(row, "pollutants")?,
        temperature: row.try_get("temperature").map_err(StorageError::Sqlx)?,
        humidity: row.try_get("humidity").map_err(StorageError::Sqlx)?,
        wind_speed: row.try_get("wind_speed").map_err(StorageError::Sqlx)?,
        wind_direction: row.try_get("wind_direction").map_err(StorageError::Sqlx)?,
        visibility: row.try_get("visibility").map_err(StorageError::Sqlx)?,
        uv_index: row.try_get("uv_index").map_err(StorageError::Sqlx)?,
        timestamp: row.try_get("timestamp").map_err(StorageError::Sqlx)?,
        source: row.try_get("source").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(42.44), 42.4);
        assert_eq!(round_tenth(42.46), 42.5);
    }
}
