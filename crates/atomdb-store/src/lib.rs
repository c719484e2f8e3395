// SPDX-License-Identifier: Apache-2.0
//! Content-addressed chunk store backends for AtomDB (spec §4.3).
//!
//! A [`ChunkStore`] is a pure byte key/value: `put` computes the hash and
//! stores the bytes (idempotent, never overwriting), `get` returns the
//! bytes for a hash or `None` if unknown. Backends never error on a
//! missing hash — absence is an ordinary result, not a failure.
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

mod filesystem;
mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

use atomdb_hash::Hash;
use thiserror::Error;

/// Failure reported by a [`ChunkStore`] backend (spec §7 `StoreIO`).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not satisfy a put/get (filesystem error,
    /// out-of-space, permission denied).
    #[error("chunk store io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Content-addressed byte blob key/value contract (spec §4.3).
///
/// Implementations expose no listing and no delete; a chunk, once put, is
/// never removed or overwritten (spec invariant I5).
pub trait ChunkStore {
    /// Compute the hash of `bytes`, store them if not already present, and
    /// return the hash. Putting an already-present hash is a no-op and
    /// returns the same hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend could not complete the write.
    fn put(&self, bytes: &[u8]) -> Result<Hash, StoreError>;

    /// Retrieve the bytes stored under `hash`, or `None` if unknown.
    /// Never errors on an unknown hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend could not complete the read
    /// (a hash it does not recognize is `Ok(None)`, not an error).
    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError>;
}
