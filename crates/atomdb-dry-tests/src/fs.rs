// SPDX-License-Identifier: Apache-2.0
//! A tempdir harness for exercising the filesystem backend across a
//! "close and reopen" boundary (spec §8 scenario S3), without every
//! dependent crate hand-rolling `tempfile::tempdir()` plumbing.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use atomdb_cell::{open, CacheKind, CodecKind, Config, StoreKind};
use tempfile::TempDir;

/// A scratch directory paired with the config needed to open cells
/// against it. Dropping this removes the directory, so keep it alive for
/// as long as any cell opened against it is in use.
pub struct FsHarness {
    _dir: TempDir,
    root: PathBuf,
}

impl FsHarness {
    /// Create a fresh, empty scratch directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    /// The scratch directory's path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Build a [`Config`] rooted at this harness's directory, with the
    /// textual codec and no cache — the configuration used to simulate
    /// "close and reopen" by constructing a second, independent cell
    /// against the same directory.
    pub fn config(&self) -> Config {
        Config {
            store: StoreKind::Filesystem(self.root.clone()),
            cache: CacheKind::None,
            codec: CodecKind::Textual,
            init: None,
        }
    }

    /// Same as [`Self::config`], but wrapped in an LRU cache of the given
    /// capacity — useful for tests that want to exercise cache eviction
    /// against a real backend.
    pub fn config_with_lru(&self, capacity: NonZeroUsize) -> Config {
        let mut config = self.config();
        config.cache = CacheKind::Lru(capacity);
        config
    }
}

impl Default for FsHarness {
    fn default() -> Self {
        Self::new()
    }
}
