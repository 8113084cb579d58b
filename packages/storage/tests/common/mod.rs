#![allow(dead_code)]

use airwatch_storage::users::{UserCreateInput, UserRole, UserWithToken};
use airwatch_storage::wards::{Ward, WardCreateInput};
use airwatch_storage::DbState;
use sqlx::sqlite::SqlitePoolOptions;

/// Helper to create an in-memory database for testing
pub async fn create_test_db() -> DbState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    DbState::migrate(&pool).await.unwrap();
    DbState::new(pool)
}

pub async fn create_user(db: &DbState, name: &str, role: UserRole) -> UserWithToken {
    db.user_storage
        .create_user(UserCreateInput {
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            role: Some(role),
            ward: None,
            ward_name: None,
            employee_id: None,
            phone_number: None,
        })
        .await
        .unwrap()
}

pub fn ward_input(name: &str, code: &str, coordinates: [f64; 2]) -> WardCreateInput {
    WardCreateInput {
        name: name.to_string(),
        code: code.to_string(),
        city: Some("Delhi".to_string()),
        area: Some(12.5),
        population: Some(250_000),
        coordinates: Some(coordinates),
        boundaries: None,
        current_aqi: None,
        aqi_level: None,
        pollutants: None,
        traffic_zones: vec!["Ring Road".to_string()],
        construction_zones: Vec::new(),
        residential_areas: Vec::new(),
        safe_zones: Vec::new(),
        unsafe_zones: Vec::new(),
    }
}

pub async fn create_ward(db: &DbState, name: &str, coordinates: [f64; 2]) -> Ward {
    db.ward_storage
        .create_ward(ward_input(name, &name.to_uppercase(), coordinates))
        .await
        .unwrap()
}
