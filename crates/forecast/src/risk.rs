//! Summary figures and risk classification.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commitment::Commitment;
use crate::series::ConsumptionPoint;

/// Below this pace ratio the commitment is at high risk.
pub const HIGH_RISK_BELOW: f64 = 0.7;

/// Below this pace ratio (and at or above [`HIGH_RISK_BELOW`]) risk is medium;
/// at or above it the commitment is on track.
pub const ON_TRACK_FROM: f64 = 0.9;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < HIGH_RISK_BELOW {
            RiskLevel::High
        } else if ratio < ON_TRACK_FROM {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// What the pace ratio was computed from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioBasis {
    /// Percent consumed against percent of term elapsed.
    Elapsed,
    /// No time has elapsed yet: projected end-of-term value against the commitment.
    Projected,
}

/// Aggregates over a trajectory; a pure function of the two series and the commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub commitment_total: f64,
    pub total_consumed: f64,
    /// `commitment - consumed`; zero or negative once the commitment is exceeded.
    pub total_remaining: f64,
    /// Unbounded above: exceeds 100 on overage.
    pub percent_consumed: f64,
    pub months_elapsed: u32,
    pub months_remaining: u32,
    pub current_run_rate: f64,
    pub projected_end_of_term: f64,
    pub shortfall: f64,
    pub overage: f64,
    pub pace_ratio: f64,
    pub ratio_basis: RatioBasis,
    pub on_track: bool,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct RiskClassifier;

impl RiskClassifier {
    pub fn summarize(
        &self,
        commitment: &Commitment,
        months_elapsed: u32,
        current_run_rate: f64,
        history: &[ConsumptionPoint],
        projected: &[ConsumptionPoint],
    ) -> Summary {
        let total = commitment.total_amount();
        let total_consumed: f64 = history.iter().map(|p| p.consumed).sum();
        let total_remaining = total - total_consumed;
        let percent_consumed = total_consumed / total * 100.0;

        let projected_end_of_term = projected.last().map_or(total_consumed, |p| p.cumulative);
        let shortfall = (total - projected_end_of_term).max(0.0);
        let overage = (projected_end_of_term - total).max(0.0);

        let expected_percent = months_elapsed as f64 / commitment.term_months() as f64 * 100.0;
        let (pace_ratio, ratio_basis) = if expected_percent > 0.0 {
            (percent_consumed / expected_percent, RatioBasis::Elapsed)
        } else {
            (projected_end_of_term / total, RatioBasis::Projected)
        };

        let risk_level = RiskLevel::from_ratio(pace_ratio);
        let on_track = pace_ratio >= ON_TRACK_FROM;

        debug!(
            total_consumed,
            projected_end_of_term,
            pace_ratio,
            basis = ?ratio_basis,
            risk = ?risk_level,
            "classified commitment risk"
        );

        Summary {
            commitment_total: total,
            total_consumed,
            total_remaining,
            percent_consumed,
            months_elapsed,
            months_remaining: commitment.term_months() - months_elapsed.min(commitment.term_months()),
            current_run_rate,
            projected_end_of_term,
            shortfall,
            overage,
            pace_ratio,
            ratio_basis,
            on_track,
            risk_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Month;
    use chrono::NaiveDate;
    use spendcast_core::{CurrencyCode, TenantId};

    fn commitment(total: f64, term: u32) -> Commitment {
        Commitment::new(
            TenantId::new(),
            total,
            term,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            CurrencyCode::new("USD").unwrap(),
        )
        .unwrap()
    }

    fn flat_points(start: Month, months: u32, amount: f64, past: bool, carried: f64) -> Vec<ConsumptionPoint> {
        let mut cumulative = carried;
        (0..months)
            .map(|i| {
                cumulative += amount;
                ConsumptionPoint {
                    month: start.plus(i),
                    consumed: if past { amount } else { 0.0 },
                    projected: amount,
                    cumulative,
                    run_rate: amount,
                }
            })
            .collect()
    }

    #[test]
    fn risk_boundaries_are_exact() {
        assert_eq!(RiskLevel::from_ratio(0.65), RiskLevel::High);
        assert_eq!(RiskLevel::from_ratio(0.6999), RiskLevel::High);
        assert_eq!(RiskLevel::from_ratio(0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_ratio(0.85), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_ratio(0.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_ratio(0.95), RiskLevel::Low);
    }

    #[test]
    fn pace_behind_schedule_is_high_risk() {
        // Half the term elapsed, a quarter consumed -> ratio 0.5.
        let c = commitment(1_200.0, 12);
        let start = c.start_month();
        let history = flat_points(start, 6, 50.0, true, 0.0);
        let projected = flat_points(start.plus(6), 6, 50.0, false, 300.0);
        let s = RiskClassifier.summarize(&c, 6, 50.0, &history, &projected);

        assert_eq!(s.total_consumed, 300.0);
        assert_eq!(s.total_remaining, 900.0);
        assert_eq!(s.percent_consumed, 25.0);
        assert_eq!(s.ratio_basis, RatioBasis::Elapsed);
        assert_eq!(s.pace_ratio, 0.5);
        assert_eq!(s.risk_level, RiskLevel::High);
        assert!(!s.on_track);
        assert_eq!(s.projected_end_of_term, 600.0);
        assert_eq!(s.shortfall, 600.0);
        assert_eq!(s.overage, 0.0);
        assert_eq!(s.months_remaining, 6);
    }

    #[test]
    fn exhausted_commitment_is_on_track_with_overage() {
        let c = commitment(1_200.0, 12);
        let history = flat_points(c.start_month(), 12, 110.0, true, 0.0);
        let s = RiskClassifier.summarize(&c, 12, 110.0, &history, &[]);

        assert!(s.total_remaining <= 0.0);
        assert_eq!(s.projected_end_of_term, s.total_consumed);
        assert_eq!(s.shortfall, 0.0);
        assert!(s.overage >= 0.0);
        assert!(s.percent_consumed > 100.0);
        assert!(s.on_track);
        assert_eq!(s.risk_level, RiskLevel::Low);
        assert_eq!(s.months_remaining, 0);
    }

    #[test]
    fn nothing_elapsed_falls_back_to_projected_coverage() {
        let c = commitment(1_200.0, 12);
        let projected = flat_points(c.start_month(), 12, 100.0, false, 0.0);
        let s = RiskClassifier.summarize(&c, 0, 100.0, &[], &projected);

        assert_eq!(s.ratio_basis, RatioBasis::Projected);
        assert_eq!(s.pace_ratio, 1.0);
        assert!(s.on_track);
        assert_eq!(s.risk_level, RiskLevel::Low);
        assert!(s.pace_ratio.is_finite());
    }
}
