// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across AirWatch

// Server Configuration
pub const AIRWATCH_PORT: &str = "AIRWATCH_PORT";
pub const PORT: &str = "PORT"; // Legacy
pub const AIRWATCH_HOST: &str = "AIRWATCH_HOST";

// Database Configuration
pub const AIRWATCH_DATABASE_PATH: &str = "AIRWATCH_DATABASE_PATH";

// CORS Configuration
pub const AIRWATCH_CORS_ORIGIN: &str = "AIRWATCH_CORS_ORIGIN";
pub const CORS_ORIGIN: &str = "CORS_ORIGIN"; // Legacy

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

// Defaults
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_LOG_FILTER: &str = "info";
