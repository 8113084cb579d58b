// ABOUTME: Token authentication for API requests
// ABOUTME: Resolves the X-API-Token header to an active user and checks roles

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use airwatch_storage::users::{User, UserRole};
use airwatch_storage::DbState;

use crate::error::ApiError;

/// Header name for API token
pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// Roles allowed to run field operations
pub const STAFF: &[UserRole] = &[UserRole::Admin, UserRole::Officer];

pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin
    }

    /// 403 unless the caller holds one of `roles`
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), ApiError> {
        if self.0.has_role(roles) {
            Ok(())
        } else {
            warn!(user = %self.0.id, role = %self.0.role, "Role check failed");
            Err(ApiError::forbidden())
        }
    }
}

impl FromRequestParts<DbState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, db: &DbState) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();

        let token = parts
            .headers
            .get(API_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        let Some(token) = token else {
            warn!(path = %path, "Missing API token");
            return Err(ApiError::Unauthorized(
                "API token required. Please include X-API-Token header.".to_string(),
            ));
        };

        match db.user_storage.find_by_token(token).await? {
            Some(user) => {
                debug!(path = %path, user = %user.id, "API token validated");
                Ok(CurrentUser(user))
            }
            None => {
                warn!(path = %path, "Invalid API token provided");
                Err(ApiError::Unauthorized("Invalid API token".to_string()))
            }
        }
    }
}
