//! Forward projection: compound growth plus planned workloads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use spendcast_core::{DomainError, DomainResult};

use crate::category::SpendCategory;
use crate::series::{ConsumptionPoint, Month};

/// Equivalent monthly compounding rate for an annual growth percentage.
///
/// `(1 + annual/100)^(1/12) - 1`
pub fn monthly_rate_from_annual(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).powf(1.0 / 12.0) - 1.0
}

/// A workload the customer plans to bring online.
///
/// Month numbering is relative to now: month 1 is the first projected month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkload {
    pub name: String,
    pub category: SpendCategory,
    /// Steady-state monthly consumption once fully ramped.
    pub estimated_monthly: f64,
    pub start_month: u32,
    pub ramp_up_months: u32,
}

impl PlannedWorkload {
    pub fn validate(&self) -> DomainResult<()> {
        if self.ramp_up_months == 0 {
            return Err(DomainError::invalid_input(format!(
                "planned workload {:?}: ramp-up must be at least one month",
                self.name
            )));
        }
        if !(self.estimated_monthly.is_finite() && self.estimated_monthly >= 0.0) {
            return Err(DomainError::invalid_input(format!(
                "planned workload {:?}: estimated monthly amount must be finite and non-negative",
                self.name
            )));
        }
        Ok(())
    }

    /// Contribution in projected month `month` (1-based).
    ///
    /// Zero before `start_month`; `estimated × k / ramp` during the `k`-th ramp
    /// month; the full estimate afterwards.
    pub fn contribution(&self, month: u32) -> f64 {
        if month < self.start_month {
            return 0.0;
        }
        let k = month - self.start_month + 1;
        if k <= self.ramp_up_months {
            self.estimated_monthly * k as f64 / self.ramp_up_months as f64
        } else {
            self.estimated_monthly
        }
    }
}

/// Projects the remaining term month by month.
#[derive(Debug, Clone)]
pub struct GrowthProjector<'a> {
    monthly_rate: f64,
    workloads: &'a [PlannedWorkload],
}

impl<'a> GrowthProjector<'a> {
    /// Validates the growth rate and every planned workload.
    pub fn new(annual_growth_percent: f64, workloads: &'a [PlannedWorkload]) -> DomainResult<Self> {
        if !(annual_growth_percent.is_finite() && annual_growth_percent > -100.0) {
            return Err(DomainError::invalid_input(
                "annual growth rate must be a finite percentage above -100",
            ));
        }
        for w in workloads {
            w.validate()?;
        }
        Ok(Self {
            monthly_rate: monthly_rate_from_annual(annual_growth_percent),
            workloads,
        })
    }

    pub fn monthly_rate(&self) -> f64 {
        self.monthly_rate
    }

    /// Amount for projected month `i` (1-based).
    pub fn amount_for(&self, run_rate: f64, i: u32) -> f64 {
        let base = run_rate * (1.0 + self.monthly_rate).powi(i as i32);
        let planned: f64 = self.workloads.iter().map(|w| w.contribution(i)).sum();
        base + planned
    }

    /// Produce `months_remaining` points starting at `anchor`.
    ///
    /// Cumulative continues from `carried_cumulative`. An empty series is
    /// returned when nothing remains.
    pub fn project(
        &self,
        anchor: Month,
        months_remaining: u32,
        run_rate: f64,
        carried_cumulative: f64,
    ) -> Vec<ConsumptionPoint> {
        let mut cumulative = carried_cumulative;
        let mut points = Vec::with_capacity(months_remaining as usize);

        for i in 1..=months_remaining {
            let amount = self.amount_for(run_rate, i);
            cumulative += amount;
            points.push(ConsumptionPoint {
                month: anchor.plus(i - 1),
                consumed: 0.0,
                projected: amount,
                cumulative,
                run_rate: amount,
            });
        }

        debug!(
            months_remaining,
            monthly_rate = self.monthly_rate,
            workloads = self.workloads.len(),
            end_cumulative = cumulative,
            "projected consumption"
        );
        points
    }
}
