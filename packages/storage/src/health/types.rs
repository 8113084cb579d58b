// ABOUTME: Health impact type definitions
// ABOUTME: Per-ward snapshot sub-documents and the aggregate views built from them

use airwatch_core::AqiLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn is_high(&self) -> bool {
        *self >= RiskLevel::High
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RespiratoryCases {
    pub total: Option<i64>,
    pub pediatric: Option<i64>,
    pub geriatric: Option<i64>,
    pub asthmatics: Option<i64>,
    pub occupational_lung: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HospitalAdmissions {
    pub respiratory: Option<i64>,
    pub cardiovascular: Option<i64>,
    pub neurological: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffectedPopulation {
    pub children: Option<i64>,
    pub elderly: Option<i64>,
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffectedInstitutions {
    pub schools: Option<i64>,
    pub hospitals: Option<i64>,
    pub day_cares: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskZone {
    pub zone: String,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub affected_institutions: AffectedInstitutions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatwaveData {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub uv_index: Option<f64>,
    pub combined_risk: Option<RiskLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MortalityEstimates {
    pub premature_deaths: Option<i64>,
    pub potential_deaths_if_uncontrolled: Option<i64>,
    pub preventable_deaths: Option<i64>,
}

/// Free-text movement descriptions, e.g. "+12%"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthTrend {
    pub day_over_day: Option<String>,
    pub week_over_week: Option<String>,
    pub month_over_month: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthImpact {
    pub id: String,
    pub ward: String,
    pub ward_name: Option<String>,
    pub date: DateTime<Utc>,
    pub aqi_level: Option<AqiLevel>,
    #[serde(rename = "currentAQI")]
    pub current_aqi: Option<f64>,
    pub respiratory_cases: RespiratoryCases,
    pub hospital_admissions: HospitalAdmissions,
    pub affected_population: AffectedPopulation,
    pub risk_zones: Vec<RiskZone>,
    pub heatwave_data: Option<HeatwaveData>,
    pub recommendations: Vec<String>,
    pub preventive_measures: Vec<String>,
    pub outbreak_risk: Option<RiskLevel>,
    pub mortality_estimates: MortalityEstimates,
    pub trend: HealthTrend,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `currentAQI` and `aqiLevel` fall back to the ward's snapshot when omitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthImpactCreateInput {
    pub ward: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub aqi_level: Option<AqiLevel>,
    #[serde(default, rename = "currentAQI")]
    pub current_aqi: Option<f64>,
    #[serde(default)]
    pub respiratory_cases: Option<RespiratoryCases>,
    #[serde(default)]
    pub hospital_admissions: Option<HospitalAdmissions>,
    #[serde(default)]
    pub affected_population: Option<AffectedPopulation>,
    #[serde(default)]
    pub risk_zones: Option<Vec<RiskZone>>,
    #[serde(default)]
    pub heatwave_data: Option<HeatwaveData>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub preventive_measures: Option<Vec<String>>,
    #[serde(default)]
    pub outbreak_risk: Option<RiskLevel>,
    #[serde(default, alias = "mortestimates")]
    pub mortality_estimates: Option<MortalityEstimates>,
    #[serde(default)]
    pub trend: Option<HealthTrend>,
}

/// Latest snapshot of one ward, reduced to the city-overview columns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardHealthSummary {
    pub ward: String,
    pub ward_name: Option<String>,
    pub aqi_level: Option<AqiLevel>,
    #[serde(rename = "currentAQI")]
    pub current_aqi: Option<f64>,
    pub respiratory_cases: Option<i64>,
    pub affected_children: Option<i64>,
    pub affected_elderly: Option<i64>,
    pub risk_level: Option<RiskLevel>,
}

impl From<HealthImpact> for WardHealthSummary {
    fn from(impact: HealthImpact) -> Self {
        Self {
            ward: impact.ward,
            ward_name: impact.ward_name,
            aqi_level: impact.aqi_level,
            current_aqi: impact.current_aqi,
            respiratory_cases: impact.respiratory_cases.total,
            affected_children: impact.affected_population.children,
            affected_elderly: impact.affected_population.elderly,
            risk_level: impact.outbreak_risk,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityHealthTotals {
    pub total_respiratory_cases: i64,
    pub affected_children: i64,
    pub affected_elderly: i64,
    pub high_risk_wards: usize,
}

impl CityHealthTotals {
    /// Missing counts add nothing; high and critical outbreak risk both count as high
    pub fn from_summaries(wards: &[WardHealthSummary]) -> Self {
        Self {
            total_respiratory_cases: wards.iter().filter_map(|w| w.respiratory_cases).sum(),
            affected_children: wards.iter().filter_map(|w| w.affected_children).sum(),
            affected_elderly: wards.iter().filter_map(|w| w.affected_elderly).sum(),
            high_risk_wards: wards
                .iter()
                .filter(|w| w.risk_level.is_some_and(|r| r.is_high()))
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityHealthOverview {
    pub city_overview: CityHealthTotals,
    pub ward_data: Vec<WardHealthSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardRiskZones {
    pub ward: Option<String>,
    pub risk_zones: Vec<RiskZone>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardHealthAdvice {
    pub ward: Option<String>,
    pub recommendations: Vec<String>,
    pub preventive_measures: Vec<String>,
    pub outbreak_risk: Option<RiskLevel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrendPoint {
    pub date: DateTime<Utc>,
    #[serde(rename = "currentAQI")]
    pub current_aqi: Option<f64>,
    pub respiratory_cases: RespiratoryCases,
    pub hospital_admissions: HospitalAdmissions,
}
