//! Projection aggregate and the engine that builds it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use spendcast_core::{DomainError, DomainResult};

use crate::allocation::{WorkloadAllocator, WorkloadBreakdown};
use crate::category::CategoryRegistry;
use crate::commitment::Commitment;
use crate::growth::{GrowthProjector, PlannedWorkload};
use crate::history::{
    DEFAULT_HISTORY_MONTHLY_GROWTH, DEFAULT_MAX_HISTORY_MONTHS, DEFAULT_VARIANCE_BAND,
    HistorySynthesizer, VarianceMode,
};
use crate::recommend::{Recommendation, RecommendationEngine};
use crate::risk::{RiskClassifier, Summary};
use crate::series::ConsumptionPoint;
use crate::velocity::{self, VelocityAnalysis};

/// Input of a single projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub commitment: Commitment,
    /// The date treated as "now".
    pub as_of: NaiveDate,
    pub current_run_rate: f64,
    pub annual_growth_percent: f64,
    #[serde(default)]
    pub planned_workloads: Vec<PlannedWorkload>,
    /// Overrides the engine's default history noise.
    #[serde(default)]
    pub variance: Option<VarianceMode>,
}

/// Tunables for history synthesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub history_monthly_growth: f64,
    pub max_history_months: u32,
    pub variance_band: f64,
    pub default_variance: VarianceMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_monthly_growth: DEFAULT_HISTORY_MONTHLY_GROWTH,
            max_history_months: DEFAULT_MAX_HISTORY_MONTHS,
            variance_band: DEFAULT_VARIANCE_BAND,
            default_variance: VarianceMode::None,
        }
    }
}

impl EngineConfig {
    pub fn with_history_monthly_growth(mut self, growth: f64) -> Self {
        self.history_monthly_growth = growth;
        self
    }

    pub fn with_max_history_months(mut self, months: u32) -> Self {
        self.max_history_months = months;
        self
    }

    pub fn with_variance_band(mut self, band: f64) -> Self {
        self.variance_band = band;
        self
    }

    pub fn with_default_variance(mut self, mode: VarianceMode) -> Self {
        self.default_variance = mode;
        self
    }
}

/// Aggregate root of a forecast. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    commitment: Commitment,
    as_of: NaiveDate,
    historical: Vec<ConsumptionPoint>,
    projected: Vec<ConsumptionPoint>,
    summary: Summary,
    breakdown: Vec<WorkloadBreakdown>,
    recommendations: Vec<Recommendation>,
}

impl Projection {
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn historical(&self) -> &[ConsumptionPoint] {
        &self.historical
    }

    pub fn projected(&self) -> &[ConsumptionPoint] {
        &self.projected
    }

    /// History followed by projection.
    pub fn trajectory(&self) -> impl Iterator<Item = &ConsumptionPoint> {
        self.historical.iter().chain(self.projected.iter())
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn breakdown(&self) -> &[WorkloadBreakdown] {
        &self.breakdown
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }
}

/// Composes history → summary → allocation → recommendations.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: EngineConfig,
    registry: CategoryRegistry,
    recommender: RecommendationEngine,
}

impl ProjectionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_recommender(mut self, recommender: RecommendationEngine) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn project(&self, request: &ProjectionRequest) -> DomainResult<Projection> {
        let run_rate = request.current_run_rate;
        if !(run_rate.is_finite() && run_rate >= 0.0) {
            return Err(DomainError::invalid_input(
                "current run rate must be finite and non-negative",
            ));
        }
        let growth = GrowthProjector::new(request.annual_growth_percent, &request.planned_workloads)?;

        let commitment = &request.commitment;
        let months_elapsed = commitment.months_elapsed(request.as_of);
        let months_remaining = commitment.months_remaining(request.as_of);
        let start = commitment.start_month();

        let mut variance = request
            .variance
            .unwrap_or(self.config.default_variance)
            .source(self.config.variance_band);
        let historical = HistorySynthesizer::new(
            self.config.history_monthly_growth,
            self.config.max_history_months,
        )
        .synthesize(start, months_elapsed, run_rate, variance.as_mut());

        let carried = historical.last().map_or(0.0, |p| p.cumulative);
        let projected = growth.project(start.plus(months_elapsed), months_remaining, run_rate, carried);

        let summary =
            RiskClassifier.summarize(commitment, months_elapsed, run_rate, &historical, &projected);
        let breakdown = WorkloadAllocator::new(self.registry).allocate(run_rate);
        let recommendations = self.recommender.recommend(&summary, &breakdown);

        info!(
            commitment = %commitment.id_typed(),
            tenant = %commitment.tenant_id(),
            months_elapsed,
            months_remaining,
            risk = ?summary.risk_level,
            shortfall = summary.shortfall,
            overage = summary.overage,
            recommendations = recommendations.len(),
            "commitment projection complete"
        );

        Ok(Projection {
            commitment: commitment.clone(),
            as_of: request.as_of,
            historical,
            projected,
            summary,
            breakdown,
            recommendations,
        })
    }

    pub fn analyze_velocity(&self, projection: &Projection) -> VelocityAnalysis {
        velocity::analyze(projection.summary())
    }
}
