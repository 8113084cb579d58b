// ABOUTME: HTTP request handlers for policy simulations
// ABOUTME: Create, fetch, ward listing, paginated listing and outcome updates

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::require_non_empty;
use airwatch_core::{PaginatedResponse, PaginationParams};
use airwatch_storage::policies::{
    PolicySimulation, SimulationCreateInput, SimulationStatus, SimulationUpdateInput,
};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ok_with_message, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct SimulationFilter {
    pub status: Option<SimulationStatus>,
}

pub async fn create_simulation(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<SimulationCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PolicySimulation>>)> {
    user.require_role(STAFF)?;
    require_non_empty("name", &input.name)?;

    info!("Creating simulation '{}'", input.name);

    let simulation = db
        .policy_storage
        .create_simulation(input, user.id())
        .await?;
    Ok(created(simulation, "Simulation created successfully"))
}

pub async fn get_simulation(
    State(db): State<DbState>,
    Path(simulation_id): Path<String>,
) -> ApiResult<Json<ApiResponse<PolicySimulation>>> {
    info!("Getting simulation {}", simulation_id);
    Ok(ok(db.policy_storage.get_simulation(&simulation_id).await?))
}

pub async fn list_ward_simulations(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
    Query(filter): Query<SimulationFilter>,
) -> ApiResult<Json<ApiResponse<Vec<PolicySimulation>>>> {
    info!(
        "Listing simulations for ward {} (status: {:?})",
        ward_id, filter.status
    );
    Ok(ok(db
        .policy_storage
        .list_for_ward(&ward_id, filter.status)
        .await?))
}

pub async fn update_simulation(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(simulation_id): Path<String>,
    Json(input): Json<SimulationUpdateInput>,
) -> ApiResult<Json<ApiResponse<PolicySimulation>>> {
    user.require_role(STAFF)?;
    info!("Updating simulation {}", simulation_id);

    let simulation = db
        .policy_storage
        .update_simulation(&simulation_id, input)
        .await?;
    Ok(ok_with_message(simulation, "Simulation updated successfully"))
}

pub async fn list_simulations(
    State(db): State<DbState>,
    Query(filter): Query<SimulationFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<PolicySimulation>>>> {
    info!(
        "Listing simulations (status: {:?}, page: {})",
        filter.status,
        pagination.page()
    );

    let (simulations, total) = db
        .policy_storage
        .list_simulations(filter.status, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::paginated(PaginatedResponse::new(
        simulations,
        &pagination,
        total,
    ))))
}
