//! Rule-driven corrective actions.
//!
//! Rules are an ordered table of `(when, build)` pairs. Every rule is
//! evaluated; matches are emitted in table order and then stable-sorted by
//! priority, so equal-priority actions keep rule order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocation::{WorkloadBreakdown, share_of};
use crate::category::SpendCategory;
use crate::risk::{RiskLevel, Summary};

/// Shortfall (as percent of what remains) above which migration is accelerated.
pub const SEVERE_SHORTFALL_PERCENT: f64 = 20.0;

/// AI/ML share of total spend below which more investment is recommended.
pub const AI_ML_TARGET_PERCENT: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Accelerate,
    Optimize,
    Migrate,
    Expand,
}

/// Ordering is by urgency: `High < Medium < Low`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    /// Signed monetary impact; negative values are savings.
    pub estimated_impact: f64,
    pub timeline: String,
}

/// Inputs every rule sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub summary: &'a Summary,
    pub breakdown: &'a [WorkloadBreakdown],
}

impl RuleContext<'_> {
    /// Shortfall as a percentage of the amount still to be consumed.
    ///
    /// Zero when nothing remains to be consumed.
    pub fn shortfall_percent(&self) -> f64 {
        if self.summary.total_remaining <= 0.0 {
            return 0.0;
        }
        self.summary.shortfall / self.summary.total_remaining * 100.0
    }

    /// `fraction` of the run rate over the rest of the term.
    fn remaining_run_value(&self, fraction: f64) -> f64 {
        fraction * self.summary.current_run_rate * self.summary.months_remaining as f64
    }

    fn severe_shortfall(&self) -> bool {
        self.shortfall_percent() > SEVERE_SHORTFALL_PERCENT
    }
}

/// One predicate/action pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub when: fn(&RuleContext<'_>) -> bool,
    pub build: fn(&RuleContext<'_>) -> Recommendation,
}

impl core::fmt::Debug for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Default rule table, in emission order.
pub static STANDARD_RULES: [Rule; 5] = [
    Rule {
        name: "accelerate_migration",
        when: |ctx| ctx.summary.shortfall > 0.0 && ctx.severe_shortfall(),
        build: |ctx| Recommendation {
            kind: RecommendationKind::Accelerate,
            priority: Priority::High,
            title: "Accelerate workload migration".to_string(),
            description: format!(
                "Projected shortfall is {:.0}% of the remaining commitment. Pull planned \
                 migrations forward to close the gap before term end.",
                ctx.shortfall_percent()
            ),
            estimated_impact: ctx.summary.shortfall * 0.5,
            timeline: "0-3 months".to_string(),
        },
    },
    Rule {
        name: "ai_adoption",
        when: |ctx| ctx.summary.shortfall > 0.0,
        build: |ctx| Recommendation {
            kind: RecommendationKind::Expand,
            priority: if ctx.severe_shortfall() {
                Priority::High
            } else {
                Priority::Medium
            },
            title: "Adopt AI services for new use cases".to_string(),
            description: "Introduce hosted model and machine learning workloads to lift \
                          consumption with business-facing outcomes."
                .to_string(),
            estimated_impact: ctx.remaining_run_value(0.30),
            timeline: "3-6 months".to_string(),
        },
    },
    Rule {
        name: "data_platform_modernization",
        when: |ctx| ctx.summary.shortfall > 0.0,
        build: |ctx| Recommendation {
            kind: RecommendationKind::Migrate,
            priority: Priority::Medium,
            title: "Modernize the data platform".to_string(),
            description: "Move legacy warehouses and ETL onto managed analytics and database \
                          services."
                .to_string(),
            estimated_impact: ctx.remaining_run_value(0.25),
            timeline: "6-12 months".to_string(),
        },
    },
    Rule {
        name: "cost_optimization",
        when: |ctx| ctx.summary.overage > 0.0,
        build: |ctx| Recommendation {
            kind: RecommendationKind::Optimize,
            priority: Priority::Medium,
            title: "Optimize costs ahead of overage".to_string(),
            description: format!(
                "Consumption is projected to exceed the commitment by {:.0}. Right-size \
                 resources and apply reservations to reduce spend.",
                ctx.summary.overage
            ),
            estimated_impact: -ctx.remaining_run_value(0.15),
            timeline: "1-3 months".to_string(),
        },
    },
    Rule {
        name: "ai_ml_investment",
        when: |ctx| {
            share_of(ctx.breakdown, SpendCategory::AiMl).is_none_or(|pct| pct < AI_ML_TARGET_PERCENT)
        },
        build: |ctx| Recommendation {
            kind: RecommendationKind::Expand,
            priority: if ctx.summary.risk_level == RiskLevel::High {
                Priority::High
            } else {
                Priority::Medium
            },
            title: "Increase AI/ML investment".to_string(),
            description: format!(
                "AI/ML is below {AI_ML_TARGET_PERCENT:.0}% of total spend. Expand model \
                 training and inference workloads."
            ),
            estimated_impact: ctx.remaining_run_value(0.20),
            timeline: "3-9 months".to_string(),
        },
    },
];

#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine {
    rules: &'static [Rule],
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecommendationEngine {
    pub fn standard() -> Self {
        Self {
            rules: &STANDARD_RULES,
        }
    }

    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Evaluate every rule and return matches ordered by priority.
    pub fn recommend(&self, summary: &Summary, breakdown: &[WorkloadBreakdown]) -> Vec<Recommendation> {
        let ctx = RuleContext { summary, breakdown };
        let mut out: Vec<Recommendation> = self
            .rules
            .iter()
            .filter(|rule| (rule.when)(&ctx))
            .map(|rule| {
                debug!(rule = rule.name, "recommendation rule matched");
                (rule.build)(&ctx)
            })
            .collect();

        // `sort_by_key` is stable: equal priorities keep rule order.
        out.sort_by_key(|r| r.priority);
        out
    }
}
