//! Benchmark suite for the try-concurrently combinator.
//!
//! Benchmarks:
//! - Single-round resolution with growing side-promise counts
//! - Multi-round driving where necessary entries resolve late
//! - Early failure teardown with many pending entries
//! - Pipeline attach from a built config
//!
//! Run:
//!   cargo bench --bench try_concurrently_bench

#![allow(missing_docs)]
#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::Value;
use std::hint::black_box;

use try_concurrently::pipeline::{FilterConfig, FilterRegistry, Pipeline, PipelineConfig};
use try_concurrently::{
    BoxPromise, Poll, Promise, PromiseExt, Slot, TryConcurrently, never, ready, try_concurrently,
};

type Side = BoxPromise<'static, Result<(), String>>;
type Combined = TryConcurrently<'static, BoxPromise<'static, Result<u64, String>>>;

/// Pending for `delay` polls, then `Ok(())`.
fn delayed(delay: u32) -> Side {
    let mut remaining = delay;
    (move || -> Poll<Result<(), String>> {
        if remaining == 0 {
            return Poll::Ready(Ok(()));
        }
        remaining -= 1;
        Poll::Pending
    })
    .boxed()
}

fn build(sides: u32, delay: u32) -> Combined {
    let mut combined = try_concurrently(ready(Ok::<u64, String>(7)).boxed());
    for i in 0..sides {
        let slot = Slot::ALL[i as usize % Slot::ALL.len()];
        let side = delayed(delay);
        combined = match slot {
            Slot::NecessaryPush => combined.necessary_push(side),
            Slot::Push => combined.push(side),
            Slot::NecessaryPull => combined.necessary_pull(side),
            Slot::Pull => combined.pull(side),
        };
    }
    combined
}

fn run(mut combined: Combined) -> (Result<u64, String>, u64) {
    loop {
        if let Poll::Ready(result) = combined.poll() {
            return (result, combined.rounds());
        }
    }
}

// =============================================================================
// SINGLE ROUND
// =============================================================================

fn bench_single_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_concurrently/single_round");

    for &sides in &[0u32, 2, 8, 32, 128] {
        group.throughput(Throughput::Elements(u64::from(sides) + 1));
        group.bench_with_input(BenchmarkId::new("ready_sides", sides), &sides, |b, &sides| {
            b.iter_batched(
                || build(sides, 0),
                |combined| black_box(run(combined)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// =============================================================================
// MULTI ROUND
// =============================================================================

fn bench_multi_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_concurrently/multi_round");

    for &delay in &[1u32, 4, 16] {
        let sides = 16u32;
        group.throughput(Throughput::Elements(u64::from(sides) * u64::from(delay + 1)));
        group.bench_with_input(BenchmarkId::new("delayed_sides", delay), &delay, |b, &delay| {
            b.iter_batched(
                || build(sides, delay),
                |combined| black_box(run(combined)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

// =============================================================================
// FAILURE TEARDOWN
// =============================================================================

fn bench_failure_teardown(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_concurrently/failure");

    for &pending in &[4u32, 64, 256] {
        group.bench_with_input(
            BenchmarkId::new("first_push_fails", pending),
            &pending,
            |b, &pending| {
                b.iter_batched(
                    || {
                        let mut combined = try_concurrently(never::<Result<u64, String>>().boxed())
                            .necessary_push(ready(Err::<(), _>("denied".to_string())));
                        for _ in 0..pending {
                            combined = combined
                                .push(never::<()>())
                                .necessary_pull(never::<Result<(), String>>());
                        }
                        combined
                    },
                    |combined| black_box(run(combined)),
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

// =============================================================================
// PIPELINE
// =============================================================================

fn pass(_: &(), _: &Value) -> Side {
    ready(Ok(())).boxed()
}

fn bench_pipeline_attach(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_concurrently/pipeline");

    let mut registry: FilterRegistry<(), String> = FilterRegistry::new();
    registry.register("pass", pass).expect("register pass");

    for &filters in &[1usize, 8, 32] {
        let config = Slot::ALL
            .iter()
            .cycle()
            .take(filters)
            .fold(PipelineConfig::new(), |config, &slot| {
                config.with_filter(FilterConfig::new("pass", slot))
            });
        let pipeline = Pipeline::build(&registry, &config).expect("valid pipeline config");

        group.throughput(Throughput::Elements(filters as u64));
        group.bench_with_input(BenchmarkId::new("attach_and_run", filters), &pipeline, |b, pipeline| {
            b.iter(|| {
                let mut call = pipeline.attach(&(), ready(Ok::<u64, String>(1)));
                black_box(call.poll())
            })
        });
    }

    group.finish();
}

// =============================================================================
// MAIN
// =============================================================================

criterion_group!(
    benches,
    bench_single_round,
    bench_multi_round,
    bench_failure_teardown,
    bench_pipeline_attach,
);

criterion_main!(benches);
