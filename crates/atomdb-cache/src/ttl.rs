// SPDX-License-Identifier: Apache-2.0
//! Fixed-lifetime TTL chunk cache (spec §4.4, §5).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use atomdb_hash::Hash;

use crate::ChunkCache;

struct Entry {
    bytes: Vec<u8>,
    inserted_at: Instant,
}

/// Fixed-lifetime cache. An entry older than its configured lifetime at
/// read time is treated as a miss and lazily dropped. No capacity limit
/// beyond expiry.
pub struct TtlCache {
    lifetime: Duration,
    entries: Mutex<HashMap<Hash, Entry>>,
}

impl TtlCache {
    /// Create a cache whose entries expire `lifetime` after insertion.
    pub fn new(lifetime: Duration) -> Self {
        Self { lifetime, entries: Mutex::new(HashMap::new()) }
    }

    /// Number of entries currently held, including ones that have expired
    /// but have not yet been read (and thus lazily dropped).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }
}

impl ChunkCache for TtlCache {
    fn get(&self, hash: &Hash) -> Option<Vec<u8>> {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match entries.get(hash) {
            Some(entry) if entry.inserted_at.elapsed() < self.lifetime => {
                Some(entry.bytes.clone())
            }
            Some(_) => {
                entries.remove(hash);
                None
            }
            None => None,
        }
    }

    fn put(&self, hash: Hash, bytes: Vec<u8>) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(hash, Entry { bytes, inserted_at: Instant::now() });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn h(seed: &[u8]) -> Hash {
        atomdb_hash::hash_bytes(seed)
    }

    #[test]
    fn hit_within_lifetime() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let hash = h(b"fresh");
        cache.put(hash, b"fresh".to_vec());
        assert_eq!(cache.get(&hash), Some(b"fresh".to_vec()));
    }

    #[test]
    fn miss_after_lifetime_elapses() {
        let cache = TtlCache::new(Duration::from_millis(5));
        let hash = h(b"stale");
        cache.put(hash, b"stale".to_vec());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&hash), None);
    }

    #[test]
    fn expired_entry_is_dropped_on_read() {
        let cache = TtlCache::new(Duration::from_millis(5));
        let hash = h(b"to-drop");
        cache.put(hash, b"to-drop".to_vec());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&hash), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn no_capacity_limit() {
        let cache = TtlCache::new(Duration::from_secs(60));
        for i in 0..100u32 {
            cache.put(h(&i.to_be_bytes()), vec![0; i as usize]);
        }
        assert_eq!(cache.len(), 100);
    }
}
