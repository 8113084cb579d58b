// ABOUTME: Policy simulations: caller-supplied predictions for pollution-control measures
// ABOUTME: Stored and tracked through their lifecycle; nothing here runs a model

pub mod storage;
pub mod types;

pub use storage::PolicyStorage;
pub use types::{
    ActualResults, PolicyImpact, PolicySimulation, PredictedReduction, SimulationCreateInput,
    SimulationParameters, SimulationStatus, SimulationType, SimulationUpdateInput,
};
