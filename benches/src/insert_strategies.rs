use std::sync::Arc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use orderbench::prelude::*;

/// Build a store with seeded base tables and a warmed key cache
fn warmed_benchmark(users: usize, products: usize) -> InsertBenchmark<MemoryOrderStore> {
    let store = Arc::new(MemoryOrderStore::new());
    let mut generator = RecordGenerator::with_seed(42);

    let usernames: Vec<String> = (0..users).map(|_| generator.username()).collect();
    let emails: Vec<String> = (0..users).map(|_| generator.email()).collect();
    store.insert_users(usernames, emails).unwrap();

    let names: Vec<String> = (0..products).map(|_| generator.product_name()).collect();
    let prices: Vec<Price> = (0..products).map(|_| generator.price()).collect();
    store.insert_products(names, prices).unwrap();

    let cache = Arc::new(KeyCache::new());
    cache.warm(&*store).unwrap();
    InsertBenchmark::new(store, cache)
}

/// Compare the four insertion disciplines at realistic batch sizes.
///
/// The expectation: per-record transactions cost the most, removing the
/// per-row commit helps, and the set-oriented shapes cost the least.
fn bench_insert_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_strategies");

    for orders in [10u32, 100, 1_000] {
        for strategy in Strategy::all() {
            group.bench_with_input(
                BenchmarkId::new(strategy.label(), orders),
                &orders,
                |b, &orders| {
                    b.iter_batched(
                        || warmed_benchmark(500, 500),
                        |benchmark| {
                            black_box(benchmark.run(strategy, orders, 3).unwrap());
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
}

/// The literal-VALUES statement grows with the row count; measure the
/// statement construction and parse cost at larger sizes
fn bench_values_statement_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_statement_growth");

    for orders in [1_000u32, 5_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(orders),
            &orders,
            |b, &orders| {
                b.iter_batched(
                    || warmed_benchmark(200, 200),
                    |benchmark| {
                        black_box(benchmark.run(Strategy::ValuesBatch, orders, 3).unwrap());
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_strategies,
    bench_values_statement_growth
);
criterion_main!(benches);
