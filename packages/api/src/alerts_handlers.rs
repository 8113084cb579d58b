// ABOUTME: HTTP request handlers for alert operations
// ABOUTME: Issuing, listing, updating and resolving ward alerts

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use airwatch_core::validation::require_non_empty;
use airwatch_storage::alerts::{Alert, AlertCreateInput, AlertUpdateInput};
use airwatch_storage::DbState;

use super::auth::{CurrentUser, STAFF};
use super::error::ApiResult;
use super::response::{created, ok, ok_with_message, ApiResponse};

pub async fn create_alert(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<AlertCreateInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Alert>>)> {
    user.require_role(STAFF)?;
    require_non_empty("title", &input.title)?;

    info!("Creating alert '{}' for {} wards", input.title, input.wards.len());

    let alert = db.alert_storage.create_alert(input, user.id()).await?;
    Ok(created(alert, "Alert created successfully"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAlertsQuery {
    pub ward_id: Option<String>,
}

pub async fn list_active_alerts(
    State(db): State<DbState>,
    Query(query): Query<ActiveAlertsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Alert>>>> {
    info!("Listing active alerts (ward: {:?})", query.ward_id);
    Ok(ok(db
        .alert_storage
        .list_active(query.ward_id.as_deref())
        .await?))
}

pub async fn list_ward_alerts(
    State(db): State<DbState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Alert>>>> {
    info!("Listing alerts for ward {}", ward_id);
    Ok(ok(db.alert_storage.list_for_ward(&ward_id).await?))
}

pub async fn get_alert(
    State(db): State<DbState>,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Alert>>> {
    Ok(ok(db.alert_storage.get_alert(&alert_id).await?))
}

pub async fn update_alert(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(alert_id): Path<String>,
    Json(input): Json<AlertUpdateInput>,
) -> ApiResult<Json<ApiResponse<Alert>>> {
    user.require_role(STAFF)?;
    info!("Updating alert {}", alert_id);

    let alert = db.alert_storage.update_alert(&alert_id, input).await?;
    Ok(ok_with_message(alert, "Alert updated successfully"))
}

pub async fn resolve_alert(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Alert>>> {
    user.require_role(STAFF)?;
    info!("Resolving alert {}", alert_id);

    let alert = db.alert_storage.resolve_alert(&alert_id).await?;
    Ok(ok_with_message(alert, "Alert resolved successfully"))
}
