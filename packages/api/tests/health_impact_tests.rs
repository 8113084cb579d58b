mod common;

use airwatch_storage::test_utils::seed_ward;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_record_and_read_ward_health() {
    let app = TestApp::new().await;
    let ward = seed_ward(&app.db, "Anand Vihar", [77.31, 28.65]).await;

    let (status, body) = app
        .post_as(
            "/api/health-impact",
            &app.officer_token,
            json!({
                "ward": ward.id,
                "currentAQI": 410,
                "respiratoryCases": {"total": 220, "pediatric": 60},
                "affectedPopulation": {"children": 1500, "elderly": 900},
                "riskZones": [{
                    "zone": "ISBT corridor",
                    "riskLevel": "critical",
                    "affectedInstitutions": {"schools": 4, "hospitals": 1}
                }],
                "recommendations": ["Keep children indoors"],
                "preventiveMeasures": ["Halt construction"],
                "outbreakRisk": "high"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Health impact data recorded successfully");
    assert_eq!(body["data"]["wardName"], "Anand Vihar");
    assert_eq!(body["data"]["aqiLevel"], "Severe");

    let (status, latest) = app
        .get(&format!("/api/health-impact/ward/{}", ward.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["data"]["respiratoryCases"]["total"], 220);

    let (status, zones) = app
        .get(&format!("/api/health-impact/ward/{}/risk-zones", ward.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zones["data"]["ward"], "Anand Vihar");
    assert_eq!(zones["data"]["riskZones"][0]["affectedInstitutions"]["schools"], 4);

    let (status, advice) = app
        .get(&format!("/api/health-impact/ward/{}/recommendations", ward.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(advice["data"]["recommendations"][0], "Keep children indoors");
    assert_eq!(advice["data"]["outbreakRisk"], "high");

    let (status, trends) = app
        .get(&format!("/api/health-impact/ward/{}/trends?days=1000000000", ward.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trends["data"].as_array().unwrap().len(), 1);

    let (status, city) = app.get("/api/health-impact/city").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(city["data"]["cityOverview"]["totalRespiratoryCases"], 220);
    assert_eq!(city["data"]["cityOverview"]["highRiskWards"], 1);
    assert_eq!(city["data"]["wardData"][0]["riskLevel"], "high");
}

#[tokio::test]
async fn test_missing_ward_data_messages() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health-impact/ward/ward-none").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Health impact data not found");

    let (status, body) = app
        .get("/api/health-impact/ward/ward-none/risk-zones")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Risk zone data not found");

    let (status, body) = app
        .get("/api/health-impact/ward/ward-none/trends")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_recording_requires_staff_and_known_ward() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_as(
            "/api/health-impact",
            &app.citizen_token,
            json!({"ward": "ward-x"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post_as(
            "/api/health-impact",
            &app.admin_token,
            json!({"ward": "ward-x"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ward not found");

    let (status, _) = app
        .post_as(
            "/api/health-impact",
            &app.admin_token,
            json!({"ward": "ward-x", "currentAQI": -5}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
