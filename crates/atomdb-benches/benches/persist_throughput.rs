// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
//! Benchmark: persisting a map of `n` string-keyed integer entries.
//!
//! Sizes (10, 100, 1_000, 10_000) give an order-of-magnitude progression.
//! Throughput "elements" are the number of map entries persisted.

use atomdb_codec::TextualCodec;
use atomdb_persist::persist;
use atomdb_store::MemoryStore;
use atomdb_value::Value;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

fn build_map(n: usize) -> Value {
    let entries = (0..n)
        .map(|i| (Value::String(format!("key-{i}")), Value::Int(i as i64)))
        .collect();
    Value::Map(entries)
}

fn bench_persist(c: &mut Criterion) {
    let mut group = c.benchmark_group("persist_throughput");
    group.warm_up_time(Duration::from_secs(2)).measurement_time(Duration::from_secs(8));
    for &n in &[10usize, 100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let value = build_map(n);
            let codec = TextualCodec;
            b.iter_batched(
                MemoryStore::new,
                |store| {
                    let hash = persist(&store, &codec, &value).expect("persist");
                    criterion::black_box(hash);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_persist);
criterion_main!(benches);
