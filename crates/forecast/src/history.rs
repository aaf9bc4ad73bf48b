//! Retrospective consumption series.
//!
//! History is reconstructed backwards from today's run rate: each earlier month
//! is discounted by a fixed monthly growth rate, then multiplied by a bounded
//! noise factor. Noise comes from a [`VarianceSource`] passed in by the caller
//! so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::series::{ConsumptionPoint, Month};

/// Assumed month-over-month growth used to discount past months.
pub const DEFAULT_HISTORY_MONTHLY_GROWTH: f64 = 0.03;

/// Older months are not modeled.
pub const DEFAULT_MAX_HISTORY_MONTHS: u32 = 24;

/// Default noise band: factors fall in `[1 - band, 1 + band]`.
pub const DEFAULT_VARIANCE_BAND: f64 = 0.1;

/// Source of multiplicative noise factors for synthesized history.
pub trait VarianceSource {
    fn next_factor(&mut self) -> f64;
}

/// No noise: every factor is exactly 1.0.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoVariance;

impl VarianceSource for NoVariance {
    fn next_factor(&mut self) -> f64 {
        1.0
    }
}

/// Seeded uniform noise in `[1 - band, 1 + band]`.
#[derive(Debug, Clone)]
pub struct SeededVariance {
    rng: StdRng,
    band: f64,
}

impl SeededVariance {
    /// `band` is clamped to `[0, 0.5]`; non-finite values mean no noise.
    pub fn new(seed: u64, band: f64) -> Self {
        let band = if band.is_finite() { band.clamp(0.0, 0.5) } else { 0.0 };
        Self {
            rng: StdRng::seed_from_u64(seed),
            band,
        }
    }
}

impl VarianceSource for SeededVariance {
    fn next_factor(&mut self) -> f64 {
        if self.band == 0.0 {
            return 1.0;
        }
        self.rng.gen_range((1.0 - self.band)..=(1.0 + self.band))
    }
}

/// How a projection request wants history noise generated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VarianceMode {
    #[default]
    None,
    Seeded {
        seed: u64,
    },
}

impl VarianceMode {
    pub fn source(self, band: f64) -> Box<dyn VarianceSource> {
        match self {
            VarianceMode::None => Box::new(NoVariance),
            VarianceMode::Seeded { seed } => Box::new(SeededVariance::new(seed, band)),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct HistorySynthesizer {
    monthly_growth: f64,
    max_months: u32,
}

impl Default for HistorySynthesizer {
    fn default() -> Self {
        Self {
            monthly_growth: DEFAULT_HISTORY_MONTHLY_GROWTH,
            max_months: DEFAULT_MAX_HISTORY_MONTHS,
        }
    }
}

impl HistorySynthesizer {
    pub fn new(monthly_growth: f64, max_months: u32) -> Self {
        Self {
            monthly_growth,
            max_months,
        }
    }

    /// Build the series for the months between `start` and now.
    ///
    /// Point `i` (months after `start`, `i < months_elapsed`) is
    /// `run_rate × (1+g)^-(months_elapsed-i) × noise`. Only the most recent
    /// `max_months` are produced; cumulative starts at zero with the first
    /// produced point.
    pub fn synthesize(
        &self,
        start: Month,
        months_elapsed: u32,
        run_rate: f64,
        variance: &mut dyn VarianceSource,
    ) -> Vec<ConsumptionPoint> {
        let first = months_elapsed.saturating_sub(self.max_months);
        let mut cumulative = 0.0;
        let mut points = Vec::with_capacity((months_elapsed - first) as usize);

        for i in first..months_elapsed {
            let regression = (1.0 + self.monthly_growth).powi(-((months_elapsed - i) as i32));
            let amount = (run_rate * regression * variance.next_factor()).max(0.0);
            cumulative += amount;
            points.push(ConsumptionPoint {
                month: start.plus(i),
                consumed: amount,
                projected: amount,
                cumulative,
                run_rate: amount,
            });
        }

        debug!(
            months_elapsed,
            points = points.len(),
            total = cumulative,
            "synthesized consumption history"
        );
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{is_chronological, is_cumulative_monotone};

    fn jan_2024() -> Month {
        Month::new(2024, 1).unwrap()
    }

    #[test]
    fn no_elapsed_months_means_no_history() {
        let points = HistorySynthesizer::default().synthesize(jan_2024(), 0, 10_000.0, &mut NoVariance);
        assert!(points.is_empty());
    }

    #[test]
    fn points_are_discounted_by_monthly_growth() {
        let points = HistorySynthesizer::default().synthesize(jan_2024(), 3, 10_000.0, &mut NoVariance);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].month, jan_2024());
        assert!((points[2].consumed - 10_000.0 / 1.03).abs() < 1e-9);
        assert!((points[0].consumed - 10_000.0 / 1.03f64.powi(3)).abs() < 1e-9);
        for p in &points {
            assert_eq!(p.consumed, p.projected);
        }
        let total: f64 = points.iter().map(|p| p.consumed).sum();
        assert!((points[2].cumulative - total).abs() < 1e-9);
    }

    #[test]
    fn history_is_capped_to_most_recent_months() {
        let points = HistorySynthesizer::default().synthesize(jan_2024(), 30, 1_000.0, &mut NoVariance);
        assert_eq!(points.len(), 24);
        assert_eq!(points[0].month, jan_2024().plus(6));
        assert_eq!(points[23].month, jan_2024().plus(29));
        assert!(is_chronological(&points));
        assert!(is_cumulative_monotone(&points));
    }

    #[test]
    fn seeded_variance_is_reproducible_and_bounded() {
        let synth = HistorySynthesizer::default();
        let a = synth.synthesize(jan_2024(), 12, 5_000.0, &mut SeededVariance::new(42, 0.1));
        let b = synth.synthesize(jan_2024(), 12, 5_000.0, &mut SeededVariance::new(42, 0.1));
        assert_eq!(a, b);

        let baseline = synth.synthesize(jan_2024(), 12, 5_000.0, &mut NoVariance);
        for (noisy, plain) in a.iter().zip(&baseline) {
            let factor = noisy.consumed / plain.consumed;
            assert!((0.9 - 1e-12..=1.1 + 1e-12).contains(&factor), "factor {factor}");
        }
    }

    #[test]
    fn zero_band_behaves_like_no_variance() {
        let mut v = SeededVariance::new(7, 0.0);
        assert_eq!(v.next_factor(), 1.0);
        let mut nan = SeededVariance::new(7, f64::NAN);
        assert_eq!(nan.next_factor(), 1.0);
    }
}
