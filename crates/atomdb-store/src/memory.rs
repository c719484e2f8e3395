// SPDX-License-Identifier: Apache-2.0
//! In-memory [`ChunkStore`] backend (spec §4.3).

use std::collections::HashMap;
use std::sync::RwLock;

use atomdb_hash::{hash_bytes, Hash};

use crate::{ChunkStore, StoreError};

/// In-process content-addressed store backed by a `HashMap`.
///
/// Thread-safe for concurrent `put`/`get`: internal state is behind a
/// single `RwLock`, readers run concurrently and writers serialize.
pub struct MemoryStore {
    chunks: RwLock<HashMap<Hash, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { chunks: RwLock::new(HashMap::new()) }
    }

    /// Number of distinct chunks currently stored.
    pub fn len(&self) -> usize {
        self.chunks.read().map_or(0, |chunks| chunks.len())
    }

    /// Returns `true` if no chunks are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkStore for MemoryStore {
    fn put(&self, bytes: &[u8]) -> Result<Hash, StoreError> {
        let hash = hash_bytes(bytes);
        let mut chunks = self.chunks.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        chunks.entry(hash).or_insert_with(|| bytes.to_vec());
        Ok(hash)
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        let chunks = self.chunks.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(chunks.get(hash).cloned())
    }
}
