// ABOUTME: AQI level bucketing for the national six-band scale and the four-band map badge
// ABOUTME: Pure functions shared by storage (derived levels) and API (badge endpoint)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Six-band AQI category stored on wards and readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "TEXT"))]
pub enum AqiLevel {
    #[default]
    Good,
    Satisfactory,
    #[serde(rename = "Moderately Polluted")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Moderately Polluted"))]
    ModeratelyPolluted,
    Poor,
    #[serde(rename = "Very Poor")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Very Poor"))]
    VeryPoor,
    Severe,
}

impl AqiLevel {
    /// Bucket a numeric AQI value. Upper bounds are inclusive.
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiLevel::Good
        } else if aqi <= 100.0 {
            AqiLevel::Satisfactory
        } else if aqi <= 200.0 {
            AqiLevel::ModeratelyPolluted
        } else if aqi <= 300.0 {
            AqiLevel::Poor
        } else if aqi <= 400.0 {
            AqiLevel::VeryPoor
        } else {
            AqiLevel::Severe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Satisfactory => "Satisfactory",
            AqiLevel::ModeratelyPolluted => "Moderately Polluted",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Severe => "Severe",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-band label shown on map markers and AQI badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeLevel {
    Good,
    Moderate,
    Unhealthy,
    Hazardous,
}

impl BadgeLevel {
    /// 0-50 Good, 51-100 Moderate, 101-150 Unhealthy, above 150 Hazardous
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            BadgeLevel::Good
        } else if aqi <= 100.0 {
            BadgeLevel::Moderate
        } else if aqi <= 150.0 {
            BadgeLevel::Unhealthy
        } else {
            BadgeLevel::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BadgeLevel::Good => "Good",
            BadgeLevel::Moderate => "Moderate",
            BadgeLevel::Unhealthy => "Unhealthy",
            BadgeLevel::Hazardous => "Hazardous",
        }
    }

    /// CSS class used by the frontend badge component
    pub fn class_name(&self) -> &'static str {
        match self {
            BadgeLevel::Good => "aqi-good",
            BadgeLevel::Moderate => "aqi-moderate",
            BadgeLevel::Unhealthy => "aqi-unhealthy",
            BadgeLevel::Hazardous => "aqi-hazardous",
        }
    }

    /// Marker colour used on the pollution map
    pub fn color(&self) -> &'static str {
        match self {
            BadgeLevel::Good => "#22c55e",
            BadgeLevel::Moderate => "#eab308",
            BadgeLevel::Unhealthy => "#f97316",
            BadgeLevel::Hazardous => "#ef4444",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, BadgeLevel::Good)]
    #[case(50.0, BadgeLevel::Good)]
    #[case(51.0, BadgeLevel::Moderate)]
    #[case(100.0, BadgeLevel::Moderate)]
    #[case(101.0, BadgeLevel::Unhealthy)]
    #[case(150.0, BadgeLevel::Unhealthy)]
    #[case(151.0, BadgeLevel::Hazardous)]
    #[case(480.0, BadgeLevel::Hazardous)]
    fn test_badge_boundaries(#[case] aqi: f64, #[case] expected: BadgeLevel) {
        assert_eq!(BadgeLevel::from_aqi(aqi), expected);
    }

    #[rstest]
    #[case(50.0, AqiLevel::Good)]
    #[case(51.0, AqiLevel::Satisfactory)]
    #[case(200.0, AqiLevel::ModeratelyPolluted)]
    #[case(201.0, AqiLevel::Poor)]
    #[case(400.0, AqiLevel::VeryPoor)]
    #[case(401.0, AqiLevel::Severe)]
    fn test_level_boundaries(#[case] aqi: f64, #[case] expected: AqiLevel) {
        assert_eq!(AqiLevel::from_aqi(aqi), expected);
    }

    #[test]
    fn test_level_serializes_with_spaces() {
        let json = serde_json::to_string(&AqiLevel::ModeratelyPolluted).unwrap();
        assert_eq!(json, "\"Moderately Polluted\"");

        let parsed: AqiLevel = serde_json::from_str("\"Very Poor\"").unwrap();
        assert_eq!(parsed, AqiLevel::VeryPoor);
    }

    #[test]
    fn test_badge_presentation() {
        let badge = BadgeLevel::from_aqi(120.0);
        assert_eq!(badge.label(), "Unhealthy");
        assert_eq!(badge.class_name(), "aqi-unhealthy");
        assert_eq!(badge.color(), "#f97316");
    }
}
