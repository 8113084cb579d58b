mod common;

use airwatch_storage::test_utils::seed_ward;
use airwatch_storage::wards::WardUpdateInput;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_requires_message_and_role() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/chatbot/chat",
            None,
            Some(json!({"message": "   ", "user_role": "citizen"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Message and user_role are required");

    let (status, _) = app
        .request(
            axum::http::Method::POST,
            "/api/chatbot/chat",
            None,
            Some(json!({"message": "hello"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_answers_about_named_ward() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Anand Vihar", [77.31, 28.65]).await;
    app.db
        .ward_storage
        .update_ward(
            &ward.id,
            WardUpdateInput {
                current_aqi: Some(360.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/chatbot/chat",
            None,
            Some(json!({"message": "How is Anand Vihar today?", "user_role": "officer"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "officer");
    assert_eq!(body["source"], "local");
    assert!(body["response"].as_str().unwrap().contains("Anand Vihar"));
}

#[tokio::test]
async fn test_unknown_ward_id_still_answers() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/chatbot/chat",
            None,
            Some(json!({
                "message": "Is it safe to go outside?",
                "user_role": "citizen",
                "ward_id": "ward-gone"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "citizen");
}
