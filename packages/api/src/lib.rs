// ABOUTME: HTTP API layer for AirWatch providing REST endpoints and routing
// ABOUTME: One router per resource, all nested under /api and sharing DbState

use axum::{
    routing::{get, post, put},
    Router,
};

use airwatch_storage::DbState;

pub mod alerts_handlers;
pub mod aqi_handlers;
pub mod auth;
pub mod broadcasts_handlers;
pub mod chatbot_handlers;
pub mod error;
pub mod health_handlers;
pub mod health_impact_handlers;
pub mod policies_handlers;
pub mod reports_handlers;
pub mod response;
pub mod rewards_handlers;
pub mod tasks_handlers;
pub mod users_handlers;
pub mod wards_handlers;

pub use error::{ApiError, ApiResult};

/// Full application router with state applied
pub fn create_router(db: DbState) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(db)
}

/// Every resource router under `/api`
pub fn create_api_router() -> Router<DbState> {
    Router::new()
        .route("/health", get(health_handlers::health_check))
        .nest("/wards", create_wards_router())
        .nest("/aqi", create_aqi_router())
        .nest("/health-impact", create_health_impact_router())
        .nest("/alerts", create_alerts_router())
        .nest("/broadcasts", create_broadcasts_router())
        .nest("/tasks", create_tasks_router())
        .nest("/policies", create_policies_router())
        .nest("/rewards", create_rewards_router())
        .nest("/reports", create_reports_router())
        .nest("/users", create_users_router())
        .route("/chatbot/chat", post(chatbot_handlers::chat))
}

pub fn create_wards_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(wards_handlers::list_wards).post(wards_handlers::create_ward),
        )
        .route("/map", get(wards_handlers::ward_map))
        .route("/nearby", get(wards_handlers::nearby_wards))
        .route("/name/{name}", get(wards_handlers::get_ward_by_name))
        .route(
            "/{id}",
            get(wards_handlers::get_ward).put(wards_handlers::update_ward),
        )
        .route("/{id}/aqi", get(wards_handlers::ward_aqi))
}

pub fn create_aqi_router() -> Router<DbState> {
    Router::new()
        .route("/", post(aqi_handlers::record_reading))
        .route("/city", get(aqi_handlers::city_overview))
        .route("/badge/{value}", get(aqi_handlers::badge))
        .route("/ward/{ward_id}", get(aqi_handlers::current_for_ward))
        .route("/ward/{ward_id}/history", get(aqi_handlers::history))
        .route("/ward/{ward_id}/trends", get(aqi_handlers::trends))
}

pub fn create_health_impact_router() -> Router<DbState> {
    Router::new()
        .route("/", post(health_impact_handlers::record_health_impact))
        .route("/city", get(health_impact_handlers::city_health_overview))
        .route("/ward/{ward_id}", get(health_impact_handlers::ward_health_impact))
        .route(
            "/ward/{ward_id}/risk-zones",
            get(health_impact_handlers::ward_risk_zones),
        )
        .route(
            "/ward/{ward_id}/trends",
            get(health_impact_handlers::ward_health_trends),
        )
        .route(
            "/ward/{ward_id}/recommendations",
            get(health_impact_handlers::ward_health_advice),
        )
}

pub fn create_alerts_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(alerts_handlers::list_active_alerts).post(alerts_handlers::create_alert),
        )
        .route("/ward/{ward_id}", get(alerts_handlers::list_ward_alerts))
        .route(
            "/{id}",
            get(alerts_handlers::get_alert).put(alerts_handlers::update_alert),
        )
        .route("/{id}/resolve", put(alerts_handlers::resolve_alert))
}

pub fn create_broadcasts_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(broadcasts_handlers::list_broadcasts).post(broadcasts_handlers::create_broadcast),
        )
        .route(
            "/ward/{ward_id}",
            get(broadcasts_handlers::list_ward_broadcasts),
        )
        .route(
            "/{id}",
            get(broadcasts_handlers::get_broadcast).put(broadcasts_handlers::update_broadcast),
        )
}

pub fn create_tasks_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(tasks_handlers::list_tasks).post(tasks_handlers::create_task),
        )
        .route("/mine", get(tasks_handlers::list_my_tasks))
        .route("/overdue", post(tasks_handlers::mark_overdue))
        .route("/ward/{ward_id}", get(tasks_handlers::list_ward_tasks))
        .route(
            "/{id}",
            get(tasks_handlers::get_task).put(tasks_handlers::update_task),
        )
}

pub fn create_policies_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(policies_handlers::list_simulations).post(policies_handlers::create_simulation),
        )
        .route(
            "/ward/{ward_id}",
            get(policies_handlers::list_ward_simulations),
        )
        .route(
            "/{id}",
            get(policies_handlers::get_simulation)
                .patch(policies_handlers::update_simulation)
                .put(policies_handlers::update_simulation),
        )
}

pub fn create_rewards_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(rewards_handlers::list_rewards).post(rewards_handlers::create_reward),
        )
        .route("/mine", get(rewards_handlers::list_my_redemptions))
        .route(
            "/redemptions/{id}",
            put(rewards_handlers::update_redemption),
        )
        .route("/{id}", get(rewards_handlers::get_reward))
        .route("/{id}/redeem", post(rewards_handlers::redeem_reward))
}

pub fn create_reports_router() -> Router<DbState> {
    Router::new()
        .route("/", post(reports_handlers::create_report))
        .route("/pending", get(reports_handlers::list_pending_reports))
        .route("/mine", get(reports_handlers::list_my_reports))
        .route("/ward/{ward_id}", get(reports_handlers::list_ward_reports))
        .route("/{id}", get(reports_handlers::get_report))
        .route("/{id}/status", put(reports_handlers::update_report_status))
        .route("/{id}/assign", put(reports_handlers::assign_report))
        .route("/{id}/comment", post(reports_handlers::add_comment))
}

pub fn create_users_router() -> Router<DbState> {
    Router::new()
        .route("/", post(users_handlers::create_user))
        .route("/register", post(users_handlers::register))
        .route(
            "/me",
            get(users_handlers::get_current_user).put(users_handlers::update_current_user),
        )
        .route("/me/token", post(users_handlers::rotate_current_token))
        .route("/{id}", get(users_handlers::get_user))
}
