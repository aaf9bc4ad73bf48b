//! Required vs actual consumption velocity.
//!
//! Divisions that can hit zero (months remaining, required velocity, run
//! rate) resolve to explicit sentinels instead of NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::risk::Summary;

pub const AHEAD_FROM: f64 = 1.1;
pub const ON_TRACK_FROM: f64 = 0.9;
pub const BEHIND_FROM: f64 = 0.7;

/// Days per month used when converting months of runway into days.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryStatus {
    Ahead,
    OnTrack,
    Behind,
    AtRisk,
}

impl TrajectoryStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= AHEAD_FROM {
            TrajectoryStatus::Ahead
        } else if ratio >= ON_TRACK_FROM {
            TrajectoryStatus::OnTrack
        } else if ratio >= BEHIND_FROM {
            TrajectoryStatus::Behind
        } else {
            TrajectoryStatus::AtRisk
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "monthly", rename_all = "snake_case")]
pub enum RequiredVelocity {
    /// Monthly consumption needed to exhaust the commitment by term end.
    /// Zero or negative when the commitment is already met.
    Monthly(f64),
    /// No months remain in the term.
    TermComplete,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum DaysToCommitment {
    Days(f64),
    /// Nothing remains to be consumed.
    Reached,
    /// The run rate is zero, so the remainder is never consumed.
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityAnalysis {
    pub required_velocity: RequiredVelocity,
    pub current_velocity: f64,
    /// `required - current`; `None` once the term is complete.
    pub velocity_gap: Option<f64>,
    /// `current / required`; `None` when required velocity is not positive.
    pub velocity_ratio: Option<f64>,
    pub trajectory: TrajectoryStatus,
    pub days_to_commitment: DaysToCommitment,
}

/// Velocity metrics for a summary.
///
/// When the ratio is undefined, trajectory is `Ahead` if the commitment is
/// already met and `AtRisk` if the term ended with a remainder.
pub fn analyze(summary: &Summary) -> VelocityAnalysis {
    let remaining = summary.total_remaining;
    let current = summary.current_run_rate;
    let met = remaining <= 0.0;

    let required_velocity = if summary.months_remaining == 0 {
        RequiredVelocity::TermComplete
    } else {
        RequiredVelocity::Monthly(remaining / summary.months_remaining as f64)
    };

    let (velocity_gap, velocity_ratio) = match required_velocity {
        RequiredVelocity::Monthly(required) if required > 0.0 => {
            (Some(required - current), Some(current / required))
        }
        RequiredVelocity::Monthly(required) => (Some(required - current), None),
        RequiredVelocity::TermComplete => (None, None),
    };

    let trajectory = match velocity_ratio {
        Some(ratio) => TrajectoryStatus::from_ratio(ratio),
        None if met => TrajectoryStatus::Ahead,
        None => TrajectoryStatus::AtRisk,
    };

    let days_to_commitment = if met {
        DaysToCommitment::Reached
    } else if current > 0.0 {
        DaysToCommitment::Days(remaining / current * DAYS_PER_MONTH)
    } else {
        DaysToCommitment::Never
    };

    VelocityAnalysis {
        required_velocity,
        current_velocity: current,
        velocity_gap,
        velocity_ratio,
        trajectory,
        days_to_commitment,
    }
}
