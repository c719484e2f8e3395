// SPDX-License-Identifier: Apache-2.0
//! Bounded in-memory chunk caches for AtomDB (spec §4.4).
//!
//! A [`ChunkCache`] sits in front of an `atomdb-store::ChunkStore` backend.
//! Semantics are advisory: a miss simply falls through to the backend, and
//! a hit may be returned without re-validation because chunks are
//! immutable (spec invariant I5) — correctness never depends on a cache
//! being present.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions
)]

mod lru_cache;
mod noop;
mod ttl;

pub use lru_cache::LruCache;
pub use noop::NoopCache;
pub use ttl::TtlCache;

use atomdb_hash::Hash;

/// Contract every chunk cache implements (spec §4.4).
///
/// Implementations must tolerate concurrent `get`/`put`; internal
/// synchronization is the implementation's concern.
pub trait ChunkCache {
    /// Return the cached bytes for `hash`, or `None` on a miss. A miss is
    /// never an error — the caller falls through to the backend.
    fn get(&self, hash: &Hash) -> Option<Vec<u8>>;

    /// Record `bytes` under `hash`. May be a no-op (e.g. [`NoopCache`]).
    fn put(&self, hash: Hash, bytes: Vec<u8>);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod contract_tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn exercise(cache: &dyn ChunkCache) {
        let hash = atomdb_hash::hash_bytes(b"cached chunk");
        cache.put(hash, b"cached chunk".to_vec());
        // All caches accept put/get without panicking; NoopCache misses,
        // the others hit. Shared behavior under test here is just "no
        // cache implementation errors on an unknown key".
        let unknown = atomdb_hash::hash_bytes(b"never cached");
        assert_eq!(cache.get(&unknown), None);
    }

    #[test]
    fn lru_satisfies_contract() {
        exercise(&LruCache::new(NonZeroUsize::new(4).expect("nonzero")));
    }

    #[test]
    fn ttl_satisfies_contract() {
        exercise(&TtlCache::new(Duration::from_secs(60)));
    }

    #[test]
    fn noop_satisfies_contract() {
        exercise(&NoopCache::new());
    }
}
