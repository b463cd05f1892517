//! Criterion benchmarks for the payout curve.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drip_core::constants::{DEFAULT_FLOOR_TOKENS, DEFAULT_SCHEDULE_WEEKS, REFERENCE_DEPOSIT_TOKENS, unit};
use drip_core::traits::PayoutCurve;
use drip_core::types::Amount;
use drip_schedule::LinearRamp;
use drip_schedule::ramp::{payout_amount, project_schedule};

fn one() -> Amount {
    unit(18).unwrap()
}

fn bench_payout_amount(c: &mut Criterion) {
    let deposit = REFERENCE_DEPOSIT_TOKENS as Amount * one();
    let floor = DEFAULT_FLOOR_TOKENS as Amount * one();

    c.bench_function("payout_amount", |b| {
        b.iter(|| payout_amount(black_box(DEFAULT_SCHEDULE_WEEKS), black_box(deposit), black_box(floor)))
    });
}

fn bench_project_schedule(c: &mut Criterion) {
    let deposit = REFERENCE_DEPOSIT_TOKENS as Amount * one();
    let floor = DEFAULT_FLOOR_TOKENS as Amount * one();

    c.bench_function("project_schedule_48_weeks", |b| {
        b.iter(|| project_schedule(black_box(DEFAULT_SCHEDULE_WEEKS), black_box(deposit), black_box(floor)))
    });
}

fn bench_engine_project(c: &mut Criterion) {
    let engine = LinearRamp::new();
    let floor = one();
    let deposit = 1_000_000 * one();

    c.bench_function("engine_project_520_weeks", |b| {
        b.iter(|| engine.project(black_box(520), black_box(deposit), black_box(floor)))
    });
}

criterion_group!(
    benches,
    bench_payout_amount,
    bench_project_schedule,
    bench_engine_project,
);
criterion_main!(benches);
