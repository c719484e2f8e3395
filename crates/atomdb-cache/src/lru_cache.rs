// SPDX-License-Identifier: Apache-2.0
//! Fixed-capacity LRU chunk cache (spec §4.4, §5).

use std::num::NonZeroUsize;
use std::sync::Mutex;

use atomdb_hash::Hash;
use lru::LruCache as Lru;

use crate::ChunkCache;

/// Fixed-capacity least-recently-used cache.
///
/// `put` makes an entry most-recently-used; when over capacity, the
/// least-recently-used entry is evicted. `get` promotes a hit to
/// most-recently-used. Recency bookkeeping is serialized behind a mutex,
/// per spec §5's requirement that the LRU cache avoid corrupting its
/// internal list under concurrent access.
pub struct LruCache {
    inner: Mutex<Lru<Hash, Vec<u8>>>,
}

impl LruCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { inner: Mutex::new(Lru::new(capacity)) }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    /// Returns `true` if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChunkCache for LruCache {
    fn get(&self, hash: &Hash) -> Option<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.get(hash).cloned()
    }

    fn put(&self, hash: Hash, bytes: Vec<u8>) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.put(hash, bytes);
    }
}
