//! Category and service level decomposition of the run rate.

use serde::{Deserialize, Serialize};

use crate::category::{CategoryRegistry, SpendCategory};

/// Share of a category taken by its first representative service.
pub const FIRST_SERVICE_SHARE: f64 = 0.40;

/// Each following service takes this much less of the category.
pub const SERVICE_SHARE_STEP: f64 = 0.10;

/// At most this many services are listed per category.
pub const MAX_SERVICES: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTrend {
    Growing,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceShare {
    pub name: String,
    pub monthly_spend: f64,
    pub trend: ServiceTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadBreakdown {
    pub category: SpendCategory,
    pub label: String,
    pub monthly_consumption: f64,
    pub percent_of_total: f64,
    /// Assumed annual growth for the category (percent).
    pub growth_rate: f64,
    pub services: Vec<ServiceShare>,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct WorkloadAllocator {
    registry: CategoryRegistry,
}

impl WorkloadAllocator {
    pub fn new(registry: CategoryRegistry) -> Self {
        Self { registry }
    }

    /// One entry per registered category, in registry order.
    pub fn allocate(&self, run_rate: f64) -> Vec<WorkloadBreakdown> {
        self.registry
            .iter()
            .map(|profile| {
                let monthly = run_rate * profile.allocation_share;
                let services = profile
                    .typical_services
                    .iter()
                    .take(MAX_SERVICES)
                    .enumerate()
                    .map(|(idx, name)| ServiceShare {
                        name: (*name).to_string(),
                        monthly_spend: monthly * (FIRST_SERVICE_SHARE - idx as f64 * SERVICE_SHARE_STEP),
                        trend: if idx == 0 {
                            ServiceTrend::Growing
                        } else {
                            ServiceTrend::Stable
                        },
                    })
                    .collect();

                WorkloadBreakdown {
                    category: profile.category,
                    label: profile.label.to_string(),
                    monthly_consumption: monthly,
                    percent_of_total: profile.allocation_share * 100.0,
                    growth_rate: profile.baseline_growth_rate,
                    services,
                }
            })
            .collect()
    }
}

/// Percent of total spend attributed to `category`, if it appears in the breakdown.
pub fn share_of(breakdown: &[WorkloadBreakdown], category: SpendCategory) -> Option<f64> {
    breakdown
        .iter()
        .find(|b| b.category == category)
        .map(|b| b.percent_of_total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_category_in_registry_order() {
        let breakdown = WorkloadAllocator::default().allocate(100_000.0);
        let order: Vec<SpendCategory> = breakdown.iter().map(|b| b.category).collect();
        assert_eq!(order, SpendCategory::ALL.to_vec());

        let compute = &breakdown[0];
        assert_eq!(compute.label, "Compute");
        assert!((compute.monthly_consumption - 35_000.0).abs() < 1e-6);
        assert!((compute.percent_of_total - 35.0).abs() < 1e-9);
        assert_eq!(compute.growth_rate, 15.0);
    }

    #[test]
    fn services_decay_by_ten_points_and_only_first_grows() {
        let breakdown = WorkloadAllocator::default().allocate(10_000.0);
        let storage = breakdown
            .iter()
            .find(|b| b.category == SpendCategory::Storage)
            .unwrap();
        assert_eq!(storage.services.len(), 3);

        let spends: Vec<f64> = storage.services.iter().map(|s| s.monthly_spend).collect();
        let monthly = storage.monthly_consumption;
        assert!((spends[0] - monthly * 0.4).abs() < 1e-9);
        assert!((spends[1] - monthly * 0.3).abs() < 1e-9);
        assert!((spends[2] - monthly * 0.2).abs() < 1e-9);

        assert_eq!(storage.services[0].trend, ServiceTrend::Growing);
        assert!(storage.services[1..].iter().all(|s| s.trend == ServiceTrend::Stable));
    }

    #[test]
    fn percentages_stay_within_bounds() {
        for b in WorkloadAllocator::default().allocate(1.0) {
            assert!((0.0..=100.0).contains(&b.percent_of_total));
        }
    }

    #[test]
    fn share_of_reports_ai_ml_percent() {
        let breakdown = WorkloadAllocator::default().allocate(1_000.0);
        let ai = share_of(&breakdown, SpendCategory::AiMl).unwrap();
        assert!((ai - 8.0).abs() < 1e-9);
        assert_eq!(share_of(&[], SpendCategory::AiMl), None);
    }
}
