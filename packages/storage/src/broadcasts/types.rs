// ABOUTME: Broadcast type definitions
// ABOUTME: Outbound messages to citizens or staff with per-channel flags and delivery counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Channels, NamedRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BroadcastType {
    #[default]
    Alert,
    Advisory,
    Information,
    Enforcement,
}

/// Who a broadcast is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    All,
    Citizens,
    Officers,
    Admins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BroadcastStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BroadcastPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    pub id: String,
    pub title: Option<String>,
    pub message: String,
    #[serde(rename = "type")]
    pub broadcast_type: BroadcastType,
    pub wards: Vec<NamedRef>,
    pub broadcast_to: Vec<Audience>,
    pub channels: Channels,
    pub sent_at: Option<DateTime<Utc>>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: BroadcastStatus,
    pub created_by: Option<NamedRef>,
    pub recipient_count: i64,
    pub success_count: i64,
    pub failure_count: i64,
    pub attachments: Vec<String>,
    pub priority: BroadcastPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastCreateInput {
    #[serde(default)]
    pub title: Option<String>,
    pub message: String,
    #[serde(default, rename = "type")]
    pub broadcast_type: Option<BroadcastType>,
    /// Ward ids
    #[serde(default)]
    pub wards: Vec<String>,
    #[serde(default)]
    pub broadcast_to: Vec<Audience>,
    #[serde(default)]
    pub channels: Channels,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub priority: Option<BroadcastPriority>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastUpdateInput {
    pub status: Option<BroadcastStatus>,
    pub success_count: Option<i64>,
    pub failure_count: Option<i64>,
    pub recipient_count: Option<i64>,
}
