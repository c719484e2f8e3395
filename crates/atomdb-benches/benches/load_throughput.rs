// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
//! Benchmark: strict `load` of a previously persisted map of `n` entries.
//!
//! Pairs with `persist_throughput`; the setup cost (persisting) is
//! excluded from the timed section via `iter_batched`.

use atomdb_codec::TextualCodec;
use atomdb_persist::{load, persist};
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

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_throughput");
    group.warm_up_time(Duration::from_secs(2)).measurement_time(Duration::from_secs(8));
    for &n in &[10usize, 100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let codec = TextualCodec;
            let store = MemoryStore::new();
            let root = persist(&store, &codec, &build_map(n)).expect("persist");
            b.iter_batched(
                || (),
                |()| {
                    let value = load(&store, &codec, &root).expect("load");
                    criterion::black_box(value);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load);
criterion_main!(benches);
