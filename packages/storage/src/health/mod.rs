// ABOUTME: Health impact snapshots recorded per ward
// ABOUTME: Respiratory load, risk zones and advice, with city totals and per-ward trends

pub mod storage;
pub mod types;

pub use storage::HealthStorage;
pub use types::{
    AffectedInstitutions, AffectedPopulation, CityHealthOverview, CityHealthTotals,
    HealthImpact, HealthImpactCreateInput, HealthTrend, HealthTrendPoint, HeatwaveData,
    HospitalAdmissions, MortalityEstimates, RespiratoryCases, RiskLevel, RiskZone,
    WardHealthAdvice, WardHealthSummary, WardRiskZones,
};
