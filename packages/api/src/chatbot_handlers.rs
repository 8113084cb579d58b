// ABOUTME: HTTP handler for the air quality advisory chatbot
// ABOUTME: Answers from the current ward snapshot using local advisory rules

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use airwatch_core::advisory::{self, CitySnapshot, WardSnapshot};
use airwatch_storage::{DbState, StorageError};

use super::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub ward_id: Option<String>,
    #[serde(default)]
    pub current_aqi: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub role: String,
    pub source: &'static str,
}

pub async fn chat(
    State(db): State<DbState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = request.message.as_deref().map(str::trim).unwrap_or_default();
    let role = request.user_role.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() || role.is_empty() {
        return Err(ApiError::validation("Message and user_role are required"));
    }

    info!("Chatbot query from {} ({} chars)", role, message.len());

    let wards = db.ward_storage.list_wards().await?;
    let snapshot = CitySnapshot::new(
        wards
            .into_iter()
            .map(|ward| WardSnapshot {
                name: ward.name,
                aqi: ward.current_aqi,
                level: ward.aqi_level,
            })
            .collect(),
    );

    // A ward the caller is looking at supplies the fallback reading
    let fallback_aqi = match (&request.ward_id, request.current_aqi) {
        (_, Some(aqi)) => Some(aqi),
        (Some(ward_id), None) => match db.ward_storage.get_ward(ward_id).await {
            Ok(ward) => Some(ward.current_aqi),
            Err(StorageError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        (None, None) => None,
    };

    let response = advisory::respond(message, &snapshot, fallback_aqi);

    Ok(Json(ChatResponse {
        success: true,
        response,
        role: role.to_string(),
        source: "local",
    }))
}
