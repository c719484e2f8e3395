// SPDX-License-Identifier: Apache-2.0
//! `open(config)` (spec §6): assemble a store/cache/codec triple and,
//! optionally, persist an initial value, producing a ready-to-use [`Cell`].

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atomdb_cache::{ChunkCache, LruCache, NoopCache, TtlCache};
use atomdb_codec::{BinaryCodec, Codec, TextualCodec};
use atomdb_store::{ChunkStore, FilesystemStore, MemoryStore};
use atomdb_value::Value;
use atomdb_view::Backend;

use crate::cell::Cell;
use crate::error::CellError;

/// Which [`atomdb_store::ChunkStore`] backend to open (spec §6 `store:`).
pub enum StoreKind {
    /// In-process [`MemoryStore`].
    Memory,
    /// [`FilesystemStore`] rooted at the given directory.
    Filesystem(PathBuf),
}

/// Which [`atomdb_cache::ChunkCache`] to wrap the store in (spec §6 `cache:`).
pub enum CacheKind {
    /// Fixed-capacity LRU cache.
    Lru(NonZeroUsize),
    /// Fixed-lifetime TTL cache.
    Ttl(Duration),
    /// No caching; every read goes to the backend.
    None,
}

/// Which [`atomdb_codec::Codec`] to encode chunks with (spec §6 `codec:`).
pub enum CodecKind {
    /// Human-readable, stable-ordered textual codec.
    Textual,
    /// Length-prefixed compact binary codec.
    Binary,
}

/// Configuration for [`open`] (spec §6 `open(config)`).
pub struct Config {
    /// Which backend to open.
    pub store: StoreKind,
    /// Which cache to wrap it in.
    pub cache: CacheKind,
    /// Which codec to encode chunks with.
    pub codec: CodecKind,
    /// An optional value to persist as the cell's initial root.
    pub init: Option<Value>,
}

impl Config {
    /// A memory-backed config with no cache, the textual codec, and no
    /// initial value — the cheapest config to construct for tests and
    /// scratch use.
    pub fn memory() -> Self {
        Self { store: StoreKind::Memory, cache: CacheKind::None, codec: CodecKind::Textual, init: None }
    }

    /// Set the initial value to persist as the cell's root.
    pub fn with_init(mut self, init: Value) -> Self {
        self.init = Some(init);
        self
    }

    /// Use the filesystem backend rooted at `path`.
    pub fn with_filesystem(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = StoreKind::Filesystem(path.into());
        self
    }

    /// Use the binary codec instead of the textual one.
    pub fn with_binary_codec(mut self) -> Self {
        self.codec = CodecKind::Binary;
        self
    }

    /// Wrap the store in an LRU cache of the given capacity.
    pub fn with_lru_cache(mut self, capacity: NonZeroUsize) -> Self {
        self.cache = CacheKind::Lru(capacity);
        self
    }

    /// Wrap the store in a TTL cache with the given lifetime.
    pub fn with_ttl_cache(mut self, lifetime: Duration) -> Self {
        self.cache = CacheKind::Ttl(lifetime);
        self
    }
}

fn build_store(kind: StoreKind) -> Arc<dyn ChunkStore + Send + Sync> {
    match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Filesystem(path) => Arc::new(FilesystemStore::new(path)),
    }
}

fn build_cache(kind: CacheKind) -> Arc<dyn ChunkCache + Send + Sync> {
    match kind {
        CacheKind::Lru(capacity) => Arc::new(LruCache::new(capacity)),
        CacheKind::Ttl(lifetime) => Arc::new(TtlCache::new(lifetime)),
        CacheKind::None => Arc::new(NoopCache::new()),
    }
}

fn build_codec(kind: CodecKind) -> Arc<dyn Codec + Send + Sync> {
    match kind {
        CodecKind::Textual => Arc::new(TextualCodec),
        CodecKind::Binary => Arc::new(BinaryCodec),
    }
}

/// Assemble a store/cache/codec triple per `config` and open a [`Cell`]
/// over it, persisting `config.init` as the initial root if supplied
/// (spec §6 `open(config) → cell`).
///
/// # Errors
///
/// Returns [`CellError`] if the initial value fails to persist.
pub fn open(config: Config) -> Result<Cell, CellError> {
    let backend =
        Backend::new(build_store(config.store), build_cache(config.cache), build_codec(config.codec));
    let root_hash = match &config.init {
        Some(value) => Some(backend.put_value(value)?),
        None => None,
    };
    Ok(Cell::from_parts(backend, Mutex::new(root_hash)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_config_opens_with_null_root() {
        let cell = open(Config::memory()).expect("open");
        assert_eq!(cell.root_hash(), None);
    }

    #[test]
    fn initial_value_is_persisted_and_observable() {
        let cell = open(Config::memory().with_init(Value::Int(7))).expect("open");
        assert!(cell.root_hash().is_some());
    }
}
