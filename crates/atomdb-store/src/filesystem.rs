// SPDX-License-Identifier: Apache-2.0
//! Filesystem [`ChunkStore`] backend (spec §4.3, §6).
//!
//! For a hash `h`, bytes live at `<root>/<h[0..2]>/<h[2..64]>`. Writes go
//! to a sibling temp file and are renamed into place so a reader never
//! observes a partial write, even across a crash between the two steps.

use std::fs;
use std::path::{Path, PathBuf};

use atomdb_hash::{hash_bytes, Hash};
use tracing::debug;

use crate::{ChunkStore, StoreError};

/// Chunk store backed by a directory tree on disk.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Create a store rooted at `root`. The directory is created lazily,
    /// on first write, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, hash: &Hash) -> PathBuf {
        let hex = hash.to_hex();
        self.root.join(&hex[0..2]).join(&hex[2..])
    }
}

impl ChunkStore for FilesystemStore {
    fn put(&self, bytes: &[u8]) -> Result<Hash, StoreError> {
        let hash = hash_bytes(bytes);
        let path = self.path_for(&hash);
        if path.exists() {
            debug!(hash = %hash, "chunk already present, skipping write");
            return Ok(hash);
        }
        let dir = path.parent().ok_or_else(|| {
            StoreError::Io(std::io::Error::other("chunk path has no parent directory"))
        })?;
        fs::create_dir_all(dir)?;

        // Write to a temp file in the same directory, then rename, so a
        // concurrent reader never sees a partially written chunk. Two
        // writers racing on the same hash both win: bytes are identical
        // by spec invariant I5, so whichever rename lands last is fine.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            use std::io::Write;
            tmp.write_all(bytes)?;
            tmp.as_file().sync_all()?;
        }
        match tmp.persist(&path) {
            Ok(_) => {}
            Err(e) if path.exists() => {
                // Another writer won the race with the same bytes; drop ours.
                drop(e.file);
            }
            Err(e) => return Err(StoreError::Io(e.error)),
        }
        debug!(hash = %hash, path = %path.display(), "wrote chunk");
        Ok(hash)
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(hash);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
