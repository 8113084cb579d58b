mod common;

use airwatch_storage::test_utils::seed_ward;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_alert_flow() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Rohini", [77.11, 28.73]).await;

    let (status, created) = app
        .post_as(
            "/api/alerts",
            &app.officer_token,
            json!({
                "title": "Severe smog",
                "type": "aqi_alert",
                "severity": "critical",
                "wards": [ward.id],
                "targetGroups": ["children", "elderly"],
                "status": "resolved"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["data"]["status"], "active");
    assert_eq!(created["data"]["wards"][0]["name"], "Rohini");
    let alert_id = created["data"]["id"].as_str().unwrap();

    let (_, active) = app
        .get(&format!("/api/alerts?wardId={}", ward.id))
        .await;
    assert_eq!(active["data"].as_array().unwrap().len(), 1);

    let (status, resolved) = app
        .put_as(
            &format!("/api/alerts/{}/resolve", alert_id),
            &app.officer_token,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["data"]["status"], "resolved");

    let (_, active) = app.get("/api/alerts").await;
    assert!(active["data"].as_array().unwrap().is_empty());

    let (_, feed) = app.get(&format!("/api/alerts/ward/{}", ward.id)).await;
    assert_eq!(feed["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.get("/api/alerts/alert-nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Alert not found");
}

#[tokio::test]
async fn test_broadcast_flow() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Rohini", [77.11, 28.73]).await;

    let (status, sent) = app
        .post_as(
            "/api/broadcasts",
            &app.admin_token,
            json!({"message": "Schools closed tomorrow", "wards": [ward.id], "broadcastTo": ["all"]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["data"]["status"], "sent");
    assert_eq!(sent["data"]["sentAt"], sent["data"]["scheduledFor"]);

    let (status, scheduled) = app
        .post_as(
            "/api/broadcasts",
            &app.admin_token,
            json!({"message": "Odd-even from Monday", "scheduledFor": "2030-01-06T06:00:00Z"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(scheduled["data"]["status"], "scheduled");
    assert!(scheduled["data"]["sentAt"].is_null());

    let (status, _) = app.get("/api/broadcasts").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, list) = app
        .get_as("/api/broadcasts?status=scheduled&limit=5", &app.officer_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["pagination"]["total"], 1);
    assert_eq!(list["pagination"]["limit"], 5);

    let (status, feed) = app.get(&format!("/api/broadcasts/ward/{}", ward.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["data"].as_array().unwrap().len(), 1);

    let (status, updated) = app
        .put_as(
            &format!("/api/broadcasts/{}", scheduled["data"]["id"].as_str().unwrap()),
            &app.admin_token,
            json!({"status": "sent", "recipientCount": 500, "successCount": 498, "failureCount": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "sent");
    assert!(!updated["data"]["sentAt"].is_null());
    assert_eq!(updated["data"]["failureCount"], 2);
}

#[tokio::test]
async fn test_task_flow() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Rohini", [77.11, 28.73]).await;
    let (_, officer) = app.get_as("/api/users/me", &app.officer_token).await;
    let officer_id = officer["data"]["id"].as_str().unwrap();

    let (status, created) = app
        .post_as(
            "/api/tasks",
            &app.admin_token,
            json!({
                "ward": ward.id,
                "assignedTo": officer_id,
                "title": "Inspect site",
                "priority": "high",
                "deadline": "2001-01-01T00:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["data"]["status"], "new");
    assert_eq!(created["data"]["assignedBy"]["name"], "Asha Admin");
    let task_id = created["data"]["id"].as_str().unwrap();

    let (_, mine) = app.get_as("/api/tasks/mine", &app.officer_token).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    let (status, sweep) = app
        .post_as("/api/tasks/overdue", &app.officer_token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sweep["data"]["updated"], 1);

    let (_, task) = app
        .get_as(&format!("/api/tasks/{}", task_id), &app.officer_token)
        .await;
    assert_eq!(task["data"]["status"], "overdue");

    let (status, done) = app
        .put_as(
            &format!("/api/tasks/{}", task_id),
            &app.officer_token,
            json!({"status": "completed", "notes": "Site sealed"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!done["data"]["completionDate"].is_null());

    let (status, _) = app.get_as("/api/tasks", &app.citizen_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, list) = app
        .get_as("/api/tasks?status=completed", &app.admin_token)
        .await;
    assert_eq!(list["pagination"]["total"], 1);
}
