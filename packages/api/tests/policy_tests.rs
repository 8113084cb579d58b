mod common;

use airwatch_storage::test_utils::seed_ward;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn create_simulation(app: &TestApp, name: &str, ward: Option<&str>) -> Value {
    let (status, body) = app
        .post_as(
            "/api/policies",
            &app.officer_token,
            json!({
                "name": name,
                "ward": ward,
                "simulationType": "traffic_restriction",
                "status": "implemented",
                "baselineAQI": 280,
                "risks": ["public resistance"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_create_forces_simulated_status() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Rohini", [77.11, 28.73]).await;

    let body = create_simulation(&app, "Odd-even", Some(&ward.id)).await;

    assert_eq!(body["message"], "Simulation created successfully");
    assert_eq!(body["data"]["status"], "simulated");
    assert_eq!(body["data"]["ward"]["name"], "Rohini");
    assert_eq!(body["data"]["createdBy"]["name"], "Omar Officer");
}

#[tokio::test]
async fn test_citizen_cannot_create() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_as(
            "/api/policies",
            &app.citizen_token,
            json!({"name": "x", "simulationType": "traffic_restriction"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_simulation_is_404() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/policies/sim-does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Simulation not found");
}

#[tokio::test]
async fn test_ward_listing_filters_by_status() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Rohini", [77.11, 28.73]).await;

    let first = create_simulation(&app, "first", Some(&ward.id)).await;
    create_simulation(&app, "second", Some(&ward.id)).await;

    let id = first["data"]["id"].as_str().unwrap();
    let (status, _) = app
        .put_as(
            &format!("/api/policies/{}", id),
            &app.officer_token,
            json!({"status": "approved"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!("/api/policies/ward/{}?status=approved", ward.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "first");

    let (_, all) = app.get(&format!("/api/policies/ward/{}", ward.id)).await;
    assert_eq!(all["data"][0]["name"], "second");
}

#[tokio::test]
async fn test_update_keeps_omitted_fields() {
    let app = TestApp::new().await;
    let created = create_simulation(&app, "Smog towers", None).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .put_as(
            &format!("/api/policies/{}", id),
            &app.officer_token,
            json!({"actualResults": {"actualAQIReduction": 12.5, "actualAQI": 240}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "simulated");
    assert_eq!(body["data"]["actualResults"]["actualAQIReduction"], 12.5);

    let (_, body) = app
        .put_as(
            &format!("/api/policies/{}", id),
            &app.officer_token,
            json!({"status": "implemented"}),
        )
        .await;
    assert_eq!(body["data"]["status"], "implemented");
    assert_eq!(body["data"]["actualResults"]["actualAQI"], 240.0);

    let (status, _) = app
        .put_as(
            "/api/policies/sim-nope",
            &app.officer_token,
            json!({"status": "approved"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_second_page() {
    let app = TestApp::new().await;
    for i in 0..45 {
        create_simulation(&app, &format!("sim {}", i), None).await;
    }

    let (status, body) = app.get("/api/policies?page=2&limit=20").await;

    assert_eq!(status, StatusCode::OK);
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 20);
    // Newest first: page 2 holds records 21-40
    assert_eq!(list[0]["name"], "sim 24");
    assert_eq!(list[19]["name"], "sim 5");
    assert_eq!(
        body["pagination"],
        json!({"total": 45, "pages": 3, "currentPage": 2, "limit": 20})
    );
}

#[tokio::test]
async fn test_patch_updates_simulation() {
    let app = TestApp::new().await;
    let created = create_simulation(&app, "Odd-even", None).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .patch_as(
            &format!("/api/policies/{}", id),
            &app.officer_token,
            json!({"status": "approved"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["name"], "Odd-even");
}

#[tokio::test]
async fn test_huge_page_returns_empty_list() {
    let app = TestApp::new().await;
    create_simulation(&app, "only", None).await;

    let (status, body) = app
        .get("/api/policies?page=9223372036854775807&limit=20")
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["total"], 1);
}
