// ABOUTME: Ward type definitions
// ABOUTME: Administrative city subdivisions carrying the latest AQI snapshot

use airwatch_core::AqiLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::Pollutants;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    pub id: String,
    pub name: String,
    pub code: String,
    pub city: Option<String>,
    pub area: Option<f64>,
    pub population: Option<i64>,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub boundaries: Option<String>,
    #[serde(rename = "currentAQI")]
    pub current_aqi: f64,
    pub aqi_level: AqiLevel,
    pub pollutants: Pollutants,
    pub traffic_zones: Vec<String>,
    pub construction_zones: Vec<String>,
    pub residential_areas: Vec<String>,
    pub safe_zones: Vec<String>,
    pub unsafe_zones: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ward {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardCreateInput {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub coordinates: Option<[f64; 2]>,
    #[serde(default)]
    pub boundaries: Option<String>,
    #[serde(default, rename = "currentAQI")]
    pub current_aqi: Option<f64>,
    #[serde(default)]
    pub aqi_level: Option<AqiLevel>,
    #[serde(default)]
    pub pollutants: Option<Pollutants>,
    #[serde(default)]
    pub traffic_zones: Vec<String>,
    #[serde(default)]
    pub construction_zones: Vec<String>,
    #[serde(default)]
    pub residential_areas: Vec<String>,
    #[serde(default)]
    pub safe_zones: Vec<String>,
    #[serde(default)]
    pub unsafe_zones: Vec<String>,
}

/// Partial update: only supplied fields are written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardUpdateInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub city: Option<String>,
    pub area: Option<f64>,
    pub population: Option<i64>,
    pub coordinates: Option<[f64; 2]>,
    pub boundaries: Option<String>,
    #[serde(rename = "currentAQI")]
    pub current_aqi: Option<f64>,
    pub aqi_level: Option<AqiLevel>,
    pub pollutants: Option<Pollutants>,
    pub traffic_zones: Option<Vec<String>>,
    pub construction_zones: Option<Vec<String>>,
    pub residential_areas: Option<Vec<String>>,
    pub safe_zones: Option<Vec<String>>,
    pub unsafe_zones: Option<Vec<String>>,
}

/// Marker data for the pollution map
#[derive(Debug, Clone, Serialize)]
pub struct WardMapEntry {
    pub id: String,
    pub name: String,
    pub aqi: f64,
    pub level: AqiLevel,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyWard {
    #[serde(flatten)]
    pub ward: Ward,
    /// Great-circle distance from the query point in metres
    pub distance: f64,
}
