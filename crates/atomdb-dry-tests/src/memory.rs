// SPDX-License-Identifier: Apache-2.0
//! A byte-budget-limited [`ChunkStore`] double, for exercising the
//! `StoreIO` failure path (spec §7) without touching the filesystem.

use std::sync::atomic::{AtomicUsize, Ordering};

use atomdb_hash::Hash;
use atomdb_store::{ChunkStore, MemoryStore, StoreError};

/// Wraps a [`MemoryStore`] and fails any `put` that would push total bytes
/// written past a fixed budget, simulating an out-of-space backend.
pub struct BudgetedMemoryStore {
    inner: MemoryStore,
    budget: usize,
    written: AtomicUsize,
}

impl BudgetedMemoryStore {
    /// Create a store that rejects writes once more than `budget` bytes
    /// have been written in total.
    pub fn new(budget: usize) -> Self {
        Self { inner: MemoryStore::new(), budget, written: AtomicUsize::new(0) }
    }

    /// Total bytes accepted so far.
    pub fn bytes_written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }
}

impl ChunkStore for BudgetedMemoryStore {
    fn put(&self, bytes: &[u8]) -> Result<Hash, StoreError> {
        let next_total = self.bytes_written() + bytes.len();
        if next_total > self.budget {
            return Err(StoreError::Io(std::io::Error::other(format!(
                "budget exceeded: {next_total} > {budget}",
                budget = self.budget
            ))));
        }
        let hash = self.inner.put(bytes)?;
        self.written.fetch_add(bytes.len(), Ordering::SeqCst);
        Ok(hash)
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(hash)
    }
}
