//! `spendcast-forecast`
//!
//! **Responsibility:** the commitment forecasting engine.
//!
//! Given a spend commitment and the current monthly run rate, this crate
//! synthesizes a consumption history, projects the remaining term under a
//! compound growth model (plus planned workloads with linear ramp-up),
//! classifies risk, breaks spend down by category and recommends corrective
//! actions.
//!
//! Everything here is deterministic domain logic: no IO, no clocks, no global
//! state. Callers pass the "as of" date and, when history variance is wanted,
//! an explicit seed.

pub mod allocation;
pub mod category;
pub mod commitment;
pub mod growth;
pub mod history;
pub mod projection;
pub mod recommend;
pub mod risk;
pub mod series;
pub mod velocity;

pub use allocation::{ServiceShare, ServiceTrend, WorkloadAllocator, WorkloadBreakdown};
pub use category::{CategoryProfile, CategoryRegistry, SpendCategory};
pub use commitment::Commitment;
pub use growth::{GrowthProjector, PlannedWorkload, monthly_rate_from_annual};
pub use history::{HistorySynthesizer, NoVariance, SeededVariance, VarianceMode, VarianceSource};
pub use projection::{EngineConfig, Projection, ProjectionEngine, ProjectionRequest};
pub use recommend::{Priority, Recommendation, RecommendationEngine, RecommendationKind};
pub use risk::{RatioBasis, RiskClassifier, RiskLevel, Summary};
pub use series::{ConsumptionPoint, Month};
pub use velocity::{DaysToCommitment, RequiredVelocity, TrajectoryStatus, VelocityAnalysis};

use spendcast_core::DomainResult;

/// Run a projection with the default engine configuration.
pub fn project(request: &ProjectionRequest) -> DomainResult<Projection> {
    ProjectionEngine::default().project(request)
}

/// Velocity metrics for a completed projection.
pub fn analyze_velocity(projection: &Projection) -> VelocityAnalysis {
    velocity::analyze(projection.summary())
}
