// ABOUTME: Shared API response envelope
// ABOUTME: Every endpoint answers with { success, message?, data?, pagination? }

use axum::{http::StatusCode, Json};
use serde::Serialize;

use airwatch_core::{PaginatedResponse, PaginationMeta};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            pagination: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn paginated(page: PaginatedResponse<T>) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(page.data),
            pagination: Some(page.pagination),
        }
    }
}

/// 200 with data
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 200 with data and a confirmation message
pub fn ok_with_message<T: Serialize>(data: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse::with_message(data, message))
}

/// 201 with the created record
pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::with_message(data, message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use airwatch_core::PaginationParams;

    #[test]
    fn test_success_omits_empty_fields() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_error_shape() {
        let body = serde_json::to_value(ApiResponse::error("Ward not found")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "message": "Ward not found"})
        );
    }

    #[test]
    fn test_paginated_carries_meta() {
        let params = PaginationParams::with_page_and_limit(2, 20);
        let page = PaginatedResponse::new(vec!["a"; 20], &params, 45);
        let body = serde_json::to_value(ApiResponse::paginated(page)).unwrap();

        assert_eq!(body["pagination"]["total"], 45);
        assert_eq!(body["pagination"]["pages"], 3);
        assert_eq!(body["pagination"]["currentPage"], 2);
        assert_eq!(body["pagination"]["limit"], 20);
        assert_eq!(body["data"].as_array().unwrap().len(), 20);
    }
}
