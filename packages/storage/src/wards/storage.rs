// ABOUTME: Ward storage layer using SQLite
// ABOUTME: CRUD, map markers and radius search over ward centroids

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::types::{NearbyWard, Ward, WardCreateInput, WardMapEntry, WardUpdateInput};
use crate::common::{json_column, map_write_err};
use crate::StorageError;

/// Metres per degree of latitude, used for the bounding-box prefilter
const METRES_PER_DEGREE: f64 = 111_320.0;

pub struct WardStorage {
    pool: SqlitePool,
}

impl WardStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all wards ordered by name
    pub async fn list_wards(&self) -> Result<Vec<Ward>, StorageError> {
        debug!("Fetching all wards");

        let rows = sqlx::query("SELECT * FROM wards ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_ward).collect()
    }

    pub async fn get_ward(&self, ward_id: &str) -> Result<Ward, StorageError> {
        debug!("Fetching ward: {}", ward_id);

        let row = sqlx::query("SELECT * FROM wards WHERE id = ?")
            .bind(ward_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Ward"))?;

        row_to_ward(&row)
    }

    pub async fn get_ward_by_name(&self, name: &str) -> Result<Ward, StorageError> {
        debug!("Fetching ward by name: {}", name);

        let row = sqlx::query("SELECT * FROM wards WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Ward"))?;

        row_to_ward(&row)
    }

    pub async fn create_ward(&self, input: WardCreateInput) -> Result<Ward, StorageError> {
        let ward_id = airwatch_core::generate_id("ward");
        let now = Utc::now();
        let [longitude, latitude] = input.coordinates.unwrap_or([0.0, 0.0]);
        let current_aqi = input.current_aqi.unwrap_or(0.0);
        let aqi_level = input.aqi_level.unwrap_or_default();

        debug!("Creating ward: {} (name: {})", ward_id, input.name);

        sqlx::query(
            r#"
            INSERT INTO wards (id, name, code, city, area, population, longitude, latitude,
                               boundaries, current_aqi, aqi_level, pollutants, traffic_zones,
                               construction_zones, residential_areas, safe_zones, unsafe_zones,
                               last_updated, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&ward_id)
        .bind(input.name.trim())
        .bind(input.code.trim())
        .bind(&input.city)
        .bind(input.area)
        .bind(input.population)
        .bind(longitude)
        .bind(latitude)
        .bind(&input.boundaries)
        .bind(current_aqi)
        .bind(aqi_level)
        .bind(Json(input.pollutants.unwrap_or_default()))
        .bind(Json(&input.traffic_zones))
        .bind(Json(&input.construction_zones))
        .bind(Json(&input.residential_areas))
        .bind(Json(&input.safe_zones))
        .bind(Json(&input.unsafe_zones))
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        self.get_ward(&ward_id).await
    }

    /// Overwrite the supplied fields of a ward
    pub async fn update_ward(
        &self,
        ward_id: &str,
        input: WardUpdateInput,
    ) -> Result<Ward, StorageError> {
        debug!("Updating ward: {}", ward_id);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE wards SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(name) = input.name {
            query_builder.push(", name = ").push_bind(name);
        }
        if let Some(code) = input.code {
            query_builder.push(", code = ").push_bind(code);
        }
        if let Some(city) = input.city {
            query_builder.push(", city = ").push_bind(city);
        }
        if let Some(area) = input.area {
            query_builder.push(", area = ").push_bind(area);
        }
        if let Some(population) = input.population {
            query_builder.push(", population = ").push_bind(population);
        }
        if let Some([longitude, latitude]) = input.coordinates {
            query_builder.push(", longitude = ").push_bind(longitude);
            query_builder.push(", latitude = ").push_bind(latitude);
        }
        if let Some(boundaries) = input.boundaries {
            query_builder.push(", boundaries = ").push_bind(boundaries);
        }
        if let Some(current_aqi) = input.current_aqi {
            query_builder.push(", current_aqi = ").push_bind(current_aqi);
        }
        if let Some(aqi_level) = input.aqi_level {
            query_builder.push(", aqi_level = ").push_bind(aqi_level);
        }
        if let Some(pollutants) = input.pollutants {
            query_builder.push(", pollutants = ").push_bind(Json(pollutants));
        }
        for (column, zones) in [
            ("traffic_zones", input.traffic_zones),
            ("construction_zones", input.construction_zones),
            ("residential_areas", input.residential_areas),
            ("safe_zones", input.safe_zones),
            ("unsafe_zones", input.unsafe_zones),
        ] {
            if let Some(zones) = zones {
                query_builder
                    .push(format!(", {} = ", column))
                    .push_bind(Json(zones));
            }
        }

        query_builder.push(" WHERE id = ").push_bind(ward_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Ward"));
        }

        self.get_ward(ward_id).await
    }

    /// Marker data for every ward
    pub async fn map_entries(&self) -> Result<Vec<WardMapEntry>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, name, current_aqi, aqi_level, longitude, latitude FROM wards ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(WardMapEntry {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    name: row.try_get("name").map_err(StorageError::Sqlx)?,
                    aqi: row.try_get("current_aqi").map_err(StorageError::Sqlx)?,
                    level: row.try_get("aqi_level").map_err(StorageError::Sqlx)?,
                    coordinates: [
                        row.try_get("longitude").map_err(StorageError::Sqlx)?,
                        row.try_get("latitude").map_err(StorageError::Sqlx)?,
                    ],
                })
            })
            .collect()
    }

    /// Wards whose centroid lies within `max_distance_m` of the point, nearest first
    pub async fn find_nearby(
        &self,
        longitude: f64,
        latitude: f64,
        max_distance_m: f64,
    ) -> Result<Vec<NearbyWard>, StorageError> {
        debug!(
            "Searching wards within {}m of ({}, {})",
            max_distance_m, longitude, latitude
        );

        // Coarse bounding box on the (latitude, longitude) index, exact filter below
        let lat_delta = max_distance_m / METRES_PER_DEGREE;
        let cos_lat = latitude.to_radians().cos().abs().max(1e-6);
        let lon_delta = (max_distance_m / (METRES_PER_DEGREE * cos_lat)).min(360.0);

        let rows = sqlx::query(
            r#"
            SELECT * FROM wards
            WHERE latitude BETWEEN ? AND ?
              AND longitude BETWEEN ? AND ?
            "#,
        )
        .bind(latitude - lat_delta)
        .bind(latitude + lat_delta)
        .bind(longitude - lon_delta)
        .bind(longitude + lon_delta)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut nearby = Vec::new();
        for row in &rows {
            let ward = row_to_ward(row)?;
            let distance =
                airwatch_core::haversine_distance_m((longitude, latitude), (ward.longitude(), ward.latitude()));
            if distance <= max_distance_m {
                nearby.push(NearbyWard { ward, distance });
            }
        }

        nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(nearby)
    }
}

pub(crate) fn row_to_ward(row: &sqlx::sqlite::SqliteRow) -> Result<Ward, StorageError> {
    Ok(Ward {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        code: row.try_get("code").map_err(StorageError::Sqlx)?,
        city: row.try_get("city").map_err(StorageError::Sqlx)?,
        area: row.try_get("area").map_err(StorageError::Sqlx)?,
        population: row.try_get("population").map_err(StorageError::Sqlx)?,
        coordinates: [
            row.try_get("longitude").map_err(StorageError::Sqlx)?,
            row.try_get("latitude").map_err(StorageError::Sqlx)?,
        ],
        boundaries: row.try_get("boundaries").map_err(StorageError::Sqlx)?,
        current_aqi: row.try_get("current_aqi").map_err(StorageError::Sqlx)?,
        aqi_level: row.try_get("aqi_level").map_err(StorageError::Sqlx)?,
        pollutants: json_column(row, "pollutants")?,
        traffic_zones: json_column(row, "traffic_zones")?,
        construction_zones: json_column(row, "construction_zones")?,
        residential_areas: json_column(row, "residential_areas")?,
        safe_zones: json_column(row, "safe_zones")?,
        unsafe_zones: json_column(row, "unsafe_zones")?,
        last_updated: row.try_get("last_updated").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
