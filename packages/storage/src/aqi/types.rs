// ABOUTME: AQI reading type definitions
// ABOUTME: Timestamped pollution readings per ward and the aggregate views built from them

use airwatch_core::AqiLevel;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{NamedRef, Pollutants};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT")]
pub enum AqiSource {
    #[default]
    OpenWeather,
    #[serde(rename = "WAQI")]
    #[sqlx(rename = "WAQI")]
    Waqi,
    Government,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiReading {
    pub id: String,
    pub ward: String,
    pub ward_name: Option<String>,
    pub aqi: f64,
    pub aqi_level: Option<AqiLevel>,
    pub pollutants: Pollutants,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<String>,
    pub visibility: Option<f64>,
    pub uv_index: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub source: AqiSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingCreateInput {
    pub ward: String,
    pub aqi: f64,
    #[serde(default)]
    pub aqi_level: Option<AqiLevel>,
    #[serde(default)]
    pub pollutants: Option<Pollutants>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<AqiSource>,
}

/// Default look-back window for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryInterval {
    #[default]
    Hourly,
    Daily,
}

impl HistoryInterval {
    pub fn window(&self) -> Duration {
        match self {
            HistoryInterval::Hourly => Duration::days(7),
            HistoryInterval::Daily => Duration::days(30),
        }
    }
}

/// Latest reading per ward and the rounded city average
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAqi {
    pub average_aqi: f64,
    pub aqi_level: AqiLevel,
    pub ward_count: usize,
    pub wards: Vec<AqiReading>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    /// `YYYY-MM-DD` (UTC)
    pub date: String,
    #[serde(rename = "avgAQI")]
    pub avg_aqi: f64,
    #[serde(rename = "maxAQI")]
    pub max_aqi: f64,
    #[serde(rename = "minAQI")]
    pub min_aqi: f64,
    #[serde(rename = "avgPM25")]
    pub avg_pm25: Option<f64>,
    #[serde(rename = "avgPM10")]
    pub avg_pm10: Option<f64>,
    pub readings: i64,
}

/// Recent readings for one ward with its current snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardAqiWindow {
    pub ward: NamedRef,
    #[serde(rename = "currentAQI")]
    pub current_aqi: f64,
    pub aqi_level: AqiLevel,
    pub data: Vec<AqiReading>,
}
