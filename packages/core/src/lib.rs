// ABOUTME: Core types, traits, and utilities for AirWatch
// ABOUTME: Foundational package providing shared functionality across all AirWatch packages

pub mod advisory;
pub mod aqi;
pub mod constants;
pub mod geo;
pub mod pagination;
pub mod utils;
pub mod validation;

// Re-export main types
pub use aqi::{AqiLevel, BadgeLevel};
pub use pagination::{PaginatedResponse, PaginationMeta, PaginationParams};

// Re-export constants
pub use constants::{airwatch_dir, database_file, DEFAULT_DATABASE_FILE};

// Re-export utilities
pub use geo::haversine_distance_m;
pub use utils::{generate_id, generate_redemption_code};

// Re-export validation
pub use validation::ValidationError;
