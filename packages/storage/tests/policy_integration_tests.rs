// ABOUTME: Integration tests for policy simulation storage
// ABOUTME: Covers forced status on create, population, ward filtering, pagination and updates

mod common;

use airwatch_storage::policies::{
    ActualResults, PredictedReduction, SimulationCreateInput, SimulationStatus, SimulationType,
    SimulationUpdateInput,
};
use airwatch_storage::users::UserRole;
use airwatch_storage::StorageError;
use common::{create_test_db, create_user, create_ward};

fn simulation_input(name: &str, ward: Option<&str>) -> SimulationCreateInput {
    SimulationCreateInput {
        name: name.to_string(),
        description: Some("Odd-even for two weeks".to_string()),
        ward: ward.map(str::to_string),
        city: Some("Delhi".to_string()),
        simulation_type: SimulationType::TrafficRestriction,
        parameters: None,
        baseline_aqi: Some(310.0),
        predicted_aqi_reduction: Some(PredictedReduction {
            percentage: Some(18.0),
            expected_aqi: Some(254.0),
            timeframe: Some("14 days".to_string()),
        }),
        cost_estimate: Some(1_500_000.0),
        implementation_days: Some(14),
        risks: vec!["Commuter pushback".to_string()],
        benefits: vec!["Lower PM2.5".to_string()],
        impact: None,
        start_date: None,
        end_date: None,
    }
}

#[tokio::test]
async fn test_create_simulation_forces_simulated_status() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Asha", UserRole::Admin).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;

    let sim = db
        .policy_storage
        .create_simulation(simulation_input("Odd-even", Some(&ward.id)), &admin.user.id)
        .await
        .unwrap();

    assert!(sim.id.starts_with("sim-"));
    assert_eq!(sim.status, SimulationStatus::Simulated);
    assert_eq!(sim.baseline_aqi, Some(310.0));
    assert_eq!(sim.risks, vec!["Commuter pushback".to_string()]);
    assert_eq!(
        sim.predicted_aqi_reduction.unwrap().expected_aqi,
        Some(254.0)
    );
}

#[tokio::test]
async fn test_get_simulation_populates_ward_and_creator() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Asha", UserRole::Admin).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;

    let created = db
        .policy_storage
        .create_simulation(simulation_input("Sprinkling", Some(&ward.id)), &admin.user.id)
        .await
        .unwrap();

    let fetched = db.policy_storage.get_simulation(&created.id).await.unwrap();

    let ward_ref = fetched.ward.unwrap();
    assert_eq!(ward_ref.id, ward.id);
    assert_eq!(ward_ref.name.as_deref(), Some("Rohini"));

    let creator = fetched.created_by.unwrap();
    assert_eq!(creator.id, admin.user.id);
    assert_eq!(creator.name.as_deref(), Some("Asha"));
}

#[tokio::test]
async fn test_dangling_ward_reference_resolves_with_null_name() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Asha", UserRole::Admin).await;

    let sim = db
        .policy_storage
        .create_simulation(simulation_input("Ghost", Some("ward-missing")), &admin.user.id)
        .await
        .unwrap();

    let ward_ref = sim.ward.unwrap();
    assert_eq!(ward_ref.id, "ward-missing");
    assert_eq!(ward_ref.name, None);
}

#[tokio::test]
async fn test_get_missing_simulation_is_not_found() {
    let db = create_test_db().await;

    let err = db.policy_storage.get_simulation("sim-nope").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound("Simulation")));
}

#[tokio::test]
async fn test_list_for_ward_filters_by_status() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Asha", UserRole::Admin).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;
    let other = create_ward(&db, "Dwarka", [77.04, 28.59]).await;

    let first = db
        .policy_storage
        .create_simulation(simulation_input("A", Some(&ward.id)), &admin.user.id)
        .await
        .unwrap();
    db.policy_storage
        .create_simulation(simulation_input("B", Some(&ward.id)), &admin.user.id)
        .await
        .unwrap();
    db.policy_storage
        .create_simulation(simulation_input("C", Some(&other.id)), &admin.user.id)
        .await
        .unwrap();

    db.policy_storage
        .update_simulation(
            &first.id,
            SimulationUpdateInput {
                status: Some(SimulationStatus::Approved),
                actual_results: None,
            },
        )
        .await
        .unwrap();

    let all = db.policy_storage.list_for_ward(&ward.id, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "B"); // newest first

    let approved = db
        .policy_storage
        .list_for_ward(&ward.id, Some(SimulationStatus::Approved))
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert!(approved.iter().all(|s| s.status == SimulationStatus::Approved));
}

#[tokio::test]
async fn test_list_simulations_second_page() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Asha", UserRole::Admin).await;

    for i in 0..45 {
        db.policy_storage
            .create_simulation(simulation_input(&format!("sim {}", i), None), &admin.user.id)
            .await
            .unwrap();
    }

    let (page, total) = db.policy_storage.list_simulations(None, 20, 20).await.unwrap();

    assert_eq!(total, 45);
    assert_eq!(page.len(), 20);
    // Newest first: page 1 holds 44..25, page 2 holds 24..5
    assert_eq!(page.first().unwrap().name, "sim 24");
    assert_eq!(page.last().unwrap().name, "sim 5");
}

#[tokio::test]
async fn test_update_only_touches_supplied_fields() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Asha", UserRole::Admin).await;

    let sim = db
        .policy_storage
        .create_simulation(simulation_input("Ban", None), &admin.user.id)
        .await
        .unwrap();

    let results = ActualResults {
        implemented_date: None,
        actual_aqi_reduction: Some(12.0),
        actual_aqi: Some(272.0),
        health_outcomes: Some("Fewer admissions".to_string()),
    };

    let updated = db
        .policy_storage
        .update_simulation(
            &sim.id,
            SimulationUpdateInput {
                status: Some(SimulationStatus::Implemented),
                actual_results: Some(results.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, SimulationStatus::Implemented);
    assert_eq!(updated.actual_results, Some(results.clone()));

    // Status-only update keeps the recorded results; any status may follow any other
    let archived = db
        .policy_storage
        .update_simulation(
            &sim.id,
            SimulationUpdateInput {
                status: Some(SimulationStatus::Draft),
                actual_results: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(archived.status, SimulationStatus::Draft);
    assert_eq!(archived.actual_results, Some(results));
    assert_eq!(archived.name, "Ban");
}

#[tokio::test]
async fn test_update_missing_simulation_is_not_found() {
    let db = create_test_db().await;

    let err = db
        .policy_storage
        .update_simulation("sim-nope", SimulationUpdateInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound("Simulation")));
}
