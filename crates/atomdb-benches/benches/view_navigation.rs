// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs)]
//! Benchmark: lazy-view child access and functional update against a
//! persisted map of `n` entries, contrasted with a no-op cache versus an
//! LRU cache warm for the whole working set.

use std::num::NonZeroUsize;
use std::sync::Arc;

use atomdb_cache::{ChunkCache, LruCache, NoopCache};
use atomdb_codec::TextualCodec;
use atomdb_store::MemoryStore;
use atomdb_value::Value;
use atomdb_view::{Backend, ViewValue};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

fn build_map(n: usize) -> Value {
    let entries =
        (0..n).map(|i| (Value::String(format!("key-{i}")), Value::Int(i as i64))).collect();
    Value::Map(entries)
}

fn backend(cache: Arc<dyn ChunkCache + Send + Sync>) -> (Backend, atomdb_hash::Hash) {
    let store = Arc::new(MemoryStore::new());
    let codec = Arc::new(TextualCodec);
    let backend = Backend::new(store, cache, codec);
    let hash = backend.put_value(&build_map(2_000)).expect("persist");
    (backend, hash)
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_navigation");
    group.warm_up_time(Duration::from_secs(2)).measurement_time(Duration::from_secs(8));
    group.throughput(Throughput::Elements(1));

    let (noop_backend, noop_hash) = backend(Arc::new(NoopCache::new()));
    group.bench_function(BenchmarkId::new("get", "no_cache"), |b| {
        b.iter(|| {
            let ViewValue::Map(map) = noop_backend.view_of(noop_hash).expect("view") else {
                unreachable!("root is a map")
            };
            let value = map.get(&Value::String("key-1000".into())).expect("get");
            criterion::black_box(value);
        });
    });

    let capacity = NonZeroUsize::new(4_096).expect("nonzero");
    let (lru_backend, lru_hash) = backend(Arc::new(LruCache::new(capacity)));
    group.bench_function(BenchmarkId::new("get", "lru_cache"), |b| {
        b.iter(|| {
            let ViewValue::Map(map) = lru_backend.view_of(lru_hash).expect("view") else {
                unreachable!("root is a map")
            };
            let value = map.get(&Value::String("key-1000".into())).expect("get");
            criterion::black_box(value);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_navigation);
criterion_main!(benches);
