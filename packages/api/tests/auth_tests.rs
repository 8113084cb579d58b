mod common;

use airwatch_storage::test_utils::seed_ward;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/users/me").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_invalid_token_is_401() {
    let app = TestApp::new().await;

    let (status, body) = app.get_as("/api/users/me", "not-a-real-token").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid API token");
}

#[tokio::test]
async fn test_me_returns_caller() {
    let app = TestApp::new().await;

    let (status, body) = app.get_as("/api/users/me", &app.citizen_token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], app.citizen_id.as_str());
    assert_eq!(body["data"]["role"], "citizen");
    assert!(body["data"].get("apiTokenHash").is_none());
}

#[tokio::test]
async fn test_wrong_role_is_403() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_as(
            "/api/wards",
            &app.officer_token,
            json!({"name": "Rohini", "code": "RH"}),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_creates_user_and_token_works() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_as(
            "/api/users",
            &app.admin_token,
            json!({"name": "New Officer", "email": "New.Officer@City.gov", "role": "officer"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["email"], "new.officer@city.gov");
    let token = body["data"]["apiToken"].as_str().unwrap().to_string();

    let (status, me) = app.get_as("/api/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["role"], "officer");

    // Same email again conflicts
    let (status, _) = app
        .post_as(
            "/api/users",
            &app.admin_token,
            json!({"name": "Dup", "email": "new.officer@city.gov"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_rejects_bad_email() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_as(
            "/api/users",
            &app.admin_token,
            json!({"name": "Someone", "email": "not-an-email"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_creates_citizen_in_named_ward() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Dwarka", [77.04, 28.59]).await;

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/users/register",
            None,
            Some(json!({
                "name": "Ravi Resident",
                "email": "ravi@example.org",
                "wardName": "Dwarka",
                "role": "admin"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["role"], "citizen");
    assert_eq!(body["data"]["user"]["ward"], ward.id.as_str());
    assert_eq!(body["data"]["user"]["wardName"], "Dwarka");

    let token = body["data"]["apiToken"].as_str().unwrap().to_string();
    let (status, me) = app.get_as("/api/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "ravi@example.org");
    assert!(me["data"].get("apiToken").is_none());
}

#[tokio::test]
async fn test_register_rejects_unknown_ward_and_duplicate_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/users/register",
            None,
            Some(json!({"name": "Ravi", "email": "ravi@example.org", "wardName": "Atlantis"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ward not found");

    let signup = json!({"name": "Ravi", "email": "ravi@example.org"});
    let (status, _) = app
        .request(axum::http::Method::POST, "/api/users/register", None, Some(signup.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(axum::http::Method::POST, "/api/users/register", None, Some(signup))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_profile_changes_only_given_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put_as(
            "/api/users/me",
            &app.citizen_token,
            json!({"phoneNumber": "+91-9800000000", "role": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["data"]["phoneNumber"], "+91-9800000000");
    assert_eq!(body["data"]["name"], "Chitra Citizen");
    assert_eq!(body["data"]["role"], "citizen");

    let (status, body) = app
        .put_as("/api/users/me", &app.citizen_token, json!({"name": "  "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app.request(axum::http::Method::PUT, "/api/users/me", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rotated_token_replaces_old_one() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/users/me/token",
            Some(&app.officer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["user"]["name"], "Omar Officer");
    let fresh = body["data"]["apiToken"].as_str().unwrap().to_string();
    assert_ne!(fresh, app.officer_token);

    let (status, _) = app.get_as("/api/users/me", &app.officer_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, me) = app.get_as("/api/users/me", &fresh).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["role"], "officer");
}
