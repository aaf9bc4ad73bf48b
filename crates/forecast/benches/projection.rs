use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use spendcast_core::{CurrencyCode, TenantId};
use spendcast_forecast::{
    Commitment, PlannedWorkload, ProjectionEngine, ProjectionRequest, SpendCategory, VarianceMode,
};

fn request(term_months: u32, workloads: usize) -> ProjectionRequest {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = start + chrono::Months::new(term_months);
    let commitment = Commitment::new(
        TenantId::new(),
        50_000_000.0,
        term_months,
        start,
        end,
        CurrencyCode::new("USD").unwrap(),
    )
    .unwrap();

    let planned_workloads = (0..workloads)
        .map(|i| PlannedWorkload {
            name: format!("workload-{i}"),
            category: SpendCategory::ALL[i % SpendCategory::ALL.len()],
            estimated_monthly: 5_000.0 + i as f64 * 250.0,
            start_month: (i % 12) as u32 + 1,
            ramp_up_months: (i % 6) as u32 + 1,
        })
        .collect();

    ProjectionRequest {
        commitment,
        as_of: start + chrono::Months::new(term_months / 2),
        current_run_rate: 400_000.0,
        annual_growth_percent: 18.0,
        planned_workloads,
        variance: Some(VarianceMode::Seeded { seed: 7 }),
    }
}

fn bench_projection(c: &mut Criterion) {
    let engine = ProjectionEngine::default();
    let mut group = c.benchmark_group("projection");

    for (term, workloads) in [(12u32, 0usize), (36, 10), (60, 100)] {
        let req = request(term, workloads);
        group.bench_with_input(
            BenchmarkId::new("project", format!("{term}m_{workloads}w")),
            &req,
            |b, req| b.iter(|| engine.project(black_box(req)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
