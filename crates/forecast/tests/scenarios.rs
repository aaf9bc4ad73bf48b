//! End-to-end forecasting scenarios through the public API.

use chrono::NaiveDate;
use proptest::prelude::*;

use spendcast_core::{CurrencyCode, TenantId};
use spendcast_forecast::{
    Commitment, ConsumptionPoint, DaysToCommitment, PlannedWorkload, Priority, ProjectionEngine,
    ProjectionRequest, RatioBasis, RecommendationKind, RequiredVelocity, RiskLevel, SpendCategory,
    VarianceMode, analyze_velocity, project,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn one_year_commitment(total: f64) -> Commitment {
    Commitment::new(
        TenantId::new(),
        total,
        12,
        date(2025, 1, 1),
        date(2026, 1, 1),
        CurrencyCode::new("USD").unwrap(),
    )
    .unwrap()
}

fn request(total: f64, as_of: NaiveDate, run_rate: f64, growth: f64) -> ProjectionRequest {
    ProjectionRequest {
        commitment: one_year_commitment(total),
        as_of,
        current_run_rate: run_rate,
        annual_growth_percent: growth,
        planned_workloads: Vec::new(),
        variance: None,
    }
}

#[test]
fn fresh_commitment_with_flat_growth_projects_half_the_commitment() {
    let req = request(1_200_000.0, date(2025, 1, 1), 50_000.0, 0.0);
    let p = project(&req).unwrap();

    assert!(p.historical().is_empty());
    assert_eq!(p.projected().len(), 12);
    assert!(p.projected().iter().all(|pt| pt.projected == 50_000.0));
    assert_eq!(p.projected()[11].cumulative, 600_000.0);

    let s = p.summary();
    assert_eq!(s.total_consumed, 0.0);
    assert_eq!(s.projected_end_of_term, 600_000.0);
    assert_eq!(s.shortfall, 600_000.0);
    assert_eq!(s.overage, 0.0);
    assert_eq!(s.ratio_basis, RatioBasis::Projected);
    assert_eq!(s.risk_level, RiskLevel::High);
    assert!(!s.on_track);

    // 600k shortfall of 1.2M remaining is 50%: migration is accelerated.
    let first = &p.recommendations()[0];
    assert_eq!(first.kind, RecommendationKind::Accelerate);
    assert_eq!(first.estimated_impact, 300_000.0);
}

#[test]
fn planned_workload_ramps_in_linearly() {
    let mut req = request(1_200_000.0, date(2025, 1, 1), 0.0, 0.0);
    req.planned_workloads.push(PlannedWorkload {
        name: "ml platform".to_string(),
        category: SpendCategory::AiMl,
        estimated_monthly: 10_000.0,
        start_month: 3,
        ramp_up_months: 4,
    });

    let p = project(&req).unwrap();
    let amounts: Vec<f64> = p.projected().iter().map(|pt| pt.projected).collect();
    assert_eq!(&amounts[..2], &[0.0, 0.0]);
    assert_eq!(amounts[2], 2_500.0);
    assert_eq!(amounts[3], 5_000.0);
    assert_eq!(amounts[4], 7_500.0);
    assert!(amounts[5..].iter().all(|a| *a == 10_000.0));
}

#[test]
fn exhausted_commitment_is_on_track_without_shortfall() {
    // Term over, run rate well above the commitment pace.
    let req = request(120_000.0, date(2026, 3, 1), 20_000.0, 0.0);
    let p = project(&req).unwrap();
    let s = p.summary();

    assert!(p.projected().is_empty());
    assert!(s.total_remaining <= 0.0);
    assert_eq!(s.shortfall, 0.0);
    assert!(s.overage >= 0.0);
    assert!(s.on_track);

    let v = analyze_velocity(&p);
    assert_eq!(v.required_velocity, RequiredVelocity::TermComplete);
    assert_eq!(v.days_to_commitment, DaysToCommitment::Reached);
}

#[test]
fn overage_produces_savings_recommendation() {
    let req = request(600_000.0, date(2025, 7, 1), 100_000.0, 10.0);
    let p = project(&req).unwrap();
    assert!(p.summary().overage > 0.0);
    let optimize = p
        .recommendations()
        .iter()
        .find(|r| r.kind == RecommendationKind::Optimize)
        .expect("optimize recommendation");
    assert!(optimize.estimated_impact < 0.0);
}

#[test]
fn velocity_uses_remaining_over_months_left() {
    let engine = ProjectionEngine::default();
    let req = request(1_200_000.0, date(2025, 7, 1), 50_000.0, 0.0);
    let p = engine.project(&req).unwrap();
    let v = engine.analyze_velocity(&p);

    let s = p.summary();
    match v.required_velocity {
        RequiredVelocity::Monthly(required) => {
            assert!((required - s.total_remaining / 6.0).abs() < 1e-6);
            assert!((v.velocity_gap.unwrap() - (required - 50_000.0)).abs() < 1e-6);
        }
        other => panic!("expected monthly velocity, got {other:?}"),
    }
}

#[test]
fn projection_serializes_to_json_and_back() {
    let mut req = request(1_200_000.0, date(2025, 4, 1), 75_000.0, 15.0);
    req.variance = Some(VarianceMode::Seeded { seed: 3 });
    let p = project(&req).unwrap();

    let json = serde_json::to_string(&p).unwrap();
    let back: spendcast_forecast::Projection = serde_json::from_str(&json).unwrap();
    assert_eq!(back.summary().risk_level, p.summary().risk_level);
    assert_eq!(back.projected().len(), p.projected().len());
}

fn all_points(p: &spendcast_forecast::Projection) -> Vec<ConsumptionPoint> {
    p.trajectory().cloned().collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: across history and projection, months strictly increase and
    /// cumulative never decreases.
    #[test]
    fn full_trajectory_is_ordered_and_monotone(
        months_in in 0u32..18,
        run_rate in 0.0f64..500_000.0,
        growth in -30.0f64..150.0,
        seed in any::<u64>(),
    ) {
        let as_of = date(2025, 1, 1) + chrono::Months::new(months_in);
        let mut req = request(2_000_000.0, as_of, run_rate, growth);
        req.variance = Some(VarianceMode::Seeded { seed });
        let p = project(&req).unwrap();
        let points = all_points(&p);

        prop_assert!(points.windows(2).all(|w| w[0].month < w[1].month));
        prop_assert!(points.windows(2).all(|w| w[0].cumulative <= w[1].cumulative));
        prop_assert_eq!(points.len(), 12);
        prop_assert!(p.recommendations().windows(2).all(|w| w[0].priority <= w[1].priority));
        prop_assert!(p.summary().shortfall >= 0.0 && p.summary().overage >= 0.0);
        prop_assert!(p.recommendations().iter().all(|r| r.priority != Priority::Low));
    }
}
