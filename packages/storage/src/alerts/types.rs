// ABOUTME: Alert type definitions
// ABOUTME: Ward-targeted pollution and health alerts with delivery channel flags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Channels, NamedRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    AqiAlert,
    HealthAdvisory,
    TrafficAdvisory,
    ConstructionAlert,
    Enforcement,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    #[default]
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGroup {
    All,
    Children,
    Elderly,
    Asthmatics,
    OutdoorWorkers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub wards: Vec<NamedRef>,
    pub target_groups: Vec<TargetGroup>,
    pub recommendations: Vec<String>,
    pub health_impact: Option<String>,
    pub status: AlertStatus,
    pub created_by: Option<NamedRef>,
    pub sent_via: Channels,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCreateInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(default)]
    pub severity: Option<AlertSeverity>,
    /// Ward ids
    #[serde(default)]
    pub wards: Vec<String>,
    #[serde(default)]
    pub target_groups: Vec<TargetGroup>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub health_impact: Option<String>,
    #[serde(default)]
    pub sent_via: Channels,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdateInput {
    pub status: Option<AlertStatus>,
    pub description: Option<String>,
    pub recommendations: Option<Vec<String>>,
}
