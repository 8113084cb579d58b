//! Test utilities shared by unit and integration tests

use sqlx::sqlite::SqlitePoolOptions;

use crate::users::{UserCreateInput, UserRole, UserWithToken};
use crate::wards::{Ward, WardCreateInput};
use crate::DbState;

/// Fresh in-memory database with all migrations applied.
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_db() -> DbState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");

    DbState::migrate(&pool).await.expect("run migrations");
    DbState::new(pool)
}

/// Insert a user with the given role
pub async fn seed_user(db: &DbState, name: &str, role: UserRole) -> UserWithToken {
    db.user_storage
        .create_user(UserCreateInput {
            name: name.to_string(),
            email: format!("{}@airwatch.test", name.to_lowercase().replace(' ', ".")),
            role: Some(role),
            ward: None,
            ward_name: None,
            employee_id: None,
            phone_number: None,
        })
        .await
        .expect("seed user")
}

/// Insert a ward at `[longitude, latitude]`
pub async fn seed_ward(db: &DbState, name: &str, coordinates: [f64; 2]) -> Ward {
    db.ward_storage
        .create_ward(WardCreateInput {
            name: name.to_string(),
            code: name.to_uppercase().replace(' ', "_"),
            city: Some("Delhi".to_string()),
            area: None,
            population: None,
            coordinates: Some(coordinates),
            boundaries: None,
            current_aqi: None,
            aqi_level: None,
            pollutants: None,
            traffic_zones: Vec::new(),
            construction_zones: Vec::new(),
            residential_areas: Vec::new(),
            safe_zones: Vec::new(),
            unsafe_zones: Vec::new(),
        })
        .await
        .expect("seed ward")
}
