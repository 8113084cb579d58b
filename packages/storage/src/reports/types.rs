// ABOUTME: Citizen pollution report type definitions
// ABOUTME: Reports move through verification and assignment and can earn green points

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::NamedRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PollutionType {
    GarbageBurn,
    Dust,
    Smoke,
    Traffic,
    Construction,
    Industrial,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Verified,
    Assigned,
    InProgress,
    Resolved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportComment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub citizen: Option<NamedRef>,
    pub ward: NamedRef,
    pub ward_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub pollution_type: PollutionType,
    pub severity: ReportSeverity,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    /// `[longitude, latitude]`
    pub location: Option<[f64; 2]>,
    pub address: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: ReportStatus,
    pub assigned_to: Option<NamedRef>,
    pub assigned_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub action_taken: Option<String>,
    pub resolved_date: Option<DateTime<Utc>>,
    pub green_points_awarded: i64,
    pub comments: Vec<ReportComment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCreateInput {
    pub ward: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub pollution_type: PollutionType,
    #[serde(default)]
    pub severity: Option<ReportSeverity>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub location: Option<[f64; 2]>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusInput {
    pub status: ReportStatus,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub green_points_awarded: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAssignInput {
    pub assigned_to: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}
