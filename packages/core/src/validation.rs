// ABOUTME: Field-level validation shared by API handlers
// ABOUTME: Required strings, coordinate ranges and numeric bounds

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Reject empty or whitespace-only strings
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Validate a `[longitude, latitude]` pair
pub fn validate_coordinates(longitude: f64, latitude: f64) -> Result<(), ValidationError> {
    if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
        return Err(ValidationError::OutOfRange {
            field: "longitude",
            min: -180.0,
            max: 180.0,
        });
    }
    if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
        return Err(ValidationError::OutOfRange {
            field: "latitude",
            min: -90.0,
            max: 90.0,
        });
    }
    Ok(())
}

/// AQI readings and point amounts must be non-negative
pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

/// Simple shape check for email addresses (local@domain.tld)
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = |message: &str| ValidationError::Invalid {
        field: "email",
        message: message.to_string(),
    };

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("malformed address"));
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && (2..=6).contains(&tld.len()) => Ok(()),
        _ => Err(invalid("malformed domain")),
    }
}
