use std::env;
use std::path::PathBuf;

/// File name of the SQLite database inside the AirWatch directory
pub const DEFAULT_DATABASE_FILE: &str = "airwatch.db";

/// Get the path to the AirWatch directory (~/.airwatch)
pub fn airwatch_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".airwatch")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".airwatch")
    }
}

/// Get the default database path (~/.airwatch/airwatch.db)
pub fn database_file() -> PathBuf {
    airwatch_dir().join(DEFAULT_DATABASE_FILE)
}
