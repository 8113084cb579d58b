#![allow(dead_code)]

use airwatch_api::create_router;
use airwatch_storage::test_utils;
use airwatch_storage::users::UserRole;
use airwatch_storage::DbState;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub db: DbState,
    pub router: Router,
    pub admin_token: String,
    pub officer_token: String,
    pub citizen_token: String,
    pub citizen_id: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = test_utils::create_test_db().await;
        let admin = test_utils::seed_user(&db, "Asha Admin", UserRole::Admin).await;
        let officer = test_utils::seed_user(&db, "Omar Officer", UserRole::Officer).await;
        let citizen = test_utils::seed_user(&db, "Chitra Citizen", UserRole::Citizen).await;

        Self {
            router: create_router(db.clone()),
            db,
            admin_token: admin.api_token,
            officer_token: officer.api_token,
            citizen_token: citizen.api_token,
            citizen_id: citizen.user.id,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("X-API-Token", token);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_as(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post_as(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put_as(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch_as(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }
}
