// ABOUTME: Reward catalogue and redemption type definitions
// ABOUTME: Partner rewards bought with green points and the vouchers issued for them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::NamedRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RewardCategory {
    Transport,
    Food,
    Retail,
    Entertainment,
    Health,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    #[default]
    Pending,
    Redeemed,
    Used,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub points_required: i64,
    pub category: RewardCategory,
    pub description: Option<String>,
    pub partner: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
    pub redeem_instructions: Option<String>,
    pub image: Option<String>,
    pub available: bool,
    pub created_by: Option<NamedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    pub fn is_redeemable_at(&self, at: DateTime<Utc>) -> bool {
        self.available && self.valid_until.map_or(true, |until| until >= at)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardCreateInput {
    pub title: String,
    pub points_required: i64,
    pub category: RewardCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub partner: Option<String>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub redeem_instructions: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

/// Reward display subset attached to redemptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRef {
    pub id: String,
    pub title: Option<String>,
    pub points_required: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReward {
    pub id: String,
    pub user: Option<String>,
    pub reward: RewardRef,
    pub redemption_code: Option<String>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub status: RedemptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedemptionUpdateInput {
    pub status: RedemptionStatus,
}
