use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::NamedRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SimulationType {
    TrafficRestriction,
    ConstructionBan,
    RoadSprinkling,
    FactoryClosure,
    VehicleBan,
    Custom,
}

/// Lifecycle status. Any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    #[default]
    Draft,
    Simulated,
    Approved,
    Implemented,
    Archived,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    /// Percentages, 0-100
    pub traffic_reduction: Option<f64>,
    pub construction_reduction: Option<f64>,
    pub industrial_reduction: Option<f64>,
    pub vehicle_restriction_type: Option<String>,
    pub spraying_intensity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictedReduction {
    pub percentage: Option<f64>,
    #[serde(rename = "expectedAQI")]
    pub expected_aqi: Option<f64>,
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyImpact {
    pub health_benefit: Option<String>,
    pub respiratory_cases_reduced: Option<i64>,
    pub children_benefited: Option<i64>,
    pub economic_impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualResults {
    pub implemented_date: Option<DateTime<Utc>>,
    #[serde(rename = "actualAQIReduction")]
    pub actual_aqi_reduction: Option<f64>,
    #[serde(rename = "actualAQI")]
    pub actual_aqi: Option<f64>,
    pub health_outcomes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySimulation {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub ward: Option<NamedRef>,
    pub city: Option<String>,
    pub simulation_type: SimulationType,
    pub parameters: Option<SimulationParameters>,
    #[serde(rename = "baselineAQI")]
    pub baseline_aqi: Option<f64>,
    #[serde(rename = "predictedAQIReduction")]
    pub predicted_aqi_reduction: Option<PredictedReduction>,
    pub cost_estimate: Option<f64>,
    pub implementation_days: Option<i64>,
    pub risks: Vec<String>,
    pub benefits: Vec<String>,
    pub impact: Option<PolicyImpact>,
    pub created_by: Option<NamedRef>,
    pub status: SimulationStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub actual_results: Option<ActualResults>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request. A `status` in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationCreateInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Ward id
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub simulation_type: SimulationType,
    #[serde(default)]
    pub parameters: Option<SimulationParameters>,
    #[serde(default, rename = "baselineAQI")]
    pub baseline_aqi: Option<f64>,
    #[serde(default, rename = "predictedAQIReduction")]
    pub predicted_aqi_reduction: Option<PredictedReduction>,
    #[serde(default)]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub implementation_days: Option<i64>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub impact: Option<PolicyImpact>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationUpdateInput {
    pub status: Option<SimulationStatus>,
    pub actual_results: Option<ActualResults>,
}
