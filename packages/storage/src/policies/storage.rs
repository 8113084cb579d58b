// ABOUTME: Policy simulation storage layer using SQLite
// ABOUTME: Create, fetch, ward listing, paginated listing and result updates

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::types::{
    PolicySimulation, SimulationCreateInput, SimulationStatus, SimulationUpdateInput,
};
use crate::common::{json_column, optional_json_column, NamedRef};
use crate::StorageError;

const SIMULATION_SELECT: &str = "SELECT p.*, w.name AS ward_name, \
     p.created_by AS creator_id, u.name AS creator_name \
     FROM policy_simulations p \
     LEFT JOIN wards w ON w.id = p.ward_id \
     LEFT JOIN users u ON u.id = p.created_by";

pub struct PolicyStorage {
    pool: SqlitePool,
}

impl PolicyStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a simulation. Status is always `simulated` on creation.
    pub async fn create_simulation(
        &self,
        input: SimulationCreateInput,
        created_by: &str,
    ) -> Result<PolicySimulation, StorageError> {
        let simulation_id = airwatch_core::generate_id("sim");
        let now = Utc::now();

        debug!(
            "Creating simulation: {} (type: {:?}, ward: {:?})",
            simulation_id, input.simulation_type, input.ward
        );

        sqlx::query(
            r#"
            INSERT INTO policy_simulations (id, name, description, ward_id, city, simulation_type,
                                            parameters, baseline_aqi, predicted_aqi_reduction,
                                            cost_estimate, implementation_days, risks, benefits,
                                            impact, created_by, status, start_date, end_date,
                                            created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&simulation_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.ward)
        .bind(&input.city)
        .bind(input.simulation_type)
        .bind(input.parameters.as_ref().map(Json))
        .bind(input.baseline_aqi)
        .bind(input.predicted_aqi_reduction.as_ref().map(Json))
        .bind(input.cost_estimate)
        .bind(input.implementation_days)
        .bind(Json(&input.risks))
        .bind(Json(&input.benefits))
        .bind(input.impact.as_ref().map(Json))
        .bind(created_by)
        .bind(SimulationStatus::Simulated)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        info!("Simulation {} stored", simulation_id);

        self.get_simulation(&simulation_id).await
    }

    /// Fetch one simulation with ward and creator resolved
    pub async fn get_simulation(&self, simulation_id: &str) -> Result<PolicySimulation, StorageError> {
        debug!("Fetching simulation: {}", simulation_id);

        let row = sqlx::query(&format!("{} WHERE p.id = ?", SIMULATION_SELECT))
            .bind(simulation_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Simulation"))?;

        row_to_simulation(&row)
    }

    /// Simulations for a ward, newest first, optionally filtered by status
    pub async fn list_for_ward(
        &self,
        ward_id: &str,
        status: Option<SimulationStatus>,
    ) -> Result<Vec<PolicySimulation>, StorageError> {
        debug!("Fetching simulations for ward {} (status: {:?})", ward_id, status);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SIMULATION_SELECT);
        query_builder.push(" WHERE p.ward_id = ").push_bind(ward_id);
        if let Some(status) = status {
            query_builder.push(" AND p.status = ").push_bind(status);
        }
        query_builder.push(" ORDER BY p.created_at DESC, p.rowid DESC");

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_simulation).collect()
    }

    /// Page of simulations, newest first, with the total matching count
    pub async fn list_simulations(
        &self,
        status: Option<SimulationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PolicySimulation>, i64), StorageError> {
        debug!(
            "Fetching simulations (status: {:?}, limit: {}, offset: {})",
            status, limit, offset
        );

        let mut count_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM policy_simulations p");
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(SIMULATION_SELECT);
        if let Some(status) = status {
            count_builder.push(" WHERE p.status = ").push_bind(status);
            query_builder.push(" WHERE p.status = ").push_bind(status);
        }
        query_builder
            .push(" ORDER BY p.created_at DESC, p.rowid DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let simulations = rows
            .iter()
            .map(row_to_simulation)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((simulations, total))
    }

    /// Overwrite `status` and `actualResults`; omitted fields keep their values
    pub async fn update_simulation(
        &self,
        simulation_id: &str,
        input: SimulationUpdateInput,
    ) -> Result<PolicySimulation, StorageError> {
        debug!("Updating simulation: {} (status: {:?})", simulation_id, input.status);

        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE policy_simulations SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(status) = input.status {
            query_builder.push(", status = ").push_bind(status);
        }
        if let Some(actual_results) = input.actual_results {
            query_builder
                .push(", actual_results = ")
                .push_bind(Json(actual_results));
        }
        query_builder.push(" WHERE id = ").push_bind(simulation_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Simulation"));
        }

        self.get_simulation(simulation_id).await
    }
}

fn row_to_simulation(row: &SqliteRow) -> Result<PolicySimulation, StorageError> {
    Ok(PolicySimulation {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        ward: NamedRef::from_row(row, "ward")?,
        city: row.try_get("city").map_err(StorageError::Sqlx)?,
        simulation_type: row.try_get("simulation_type").map_err(StorageError::Sqlx)?,
        parameters: optional_json_column(row, "parameters")?,
        baseline_aqi: row.try_get("baseline_aqi").map_err(StorageError::Sqlx)?,
        predicted_aqi_reduction: optional_json_column(row, "predicted_aqi_reduction")?,
        cost_estimate: row.try_get("cost_estimate").map_err(StorageError::Sqlx)?,
        implementation_days: row.try_get("implementation_days").map_err(StorageError::Sqlx)?,
        risks: json_column(row, "risks")?,
        benefits: json_column(row, "benefits")?,
        impact: optional_json_column(row, "impact")?,
        created_by: NamedRef::from_row(row, "creator")?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        start_date: row.try_get("start_date").map_err(StorageError::Sqlx)?,
        end_date: row.try_get("end_date").map_err(StorageError::Sqlx)?,
        actual_results: optional_json_column(row, "actual_results")?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
