// SPDX-License-Identifier: Apache-2.0
//! Errors surfaced by the Persister and Loader (spec §7).

use atomdb_codec::CodecError;
use atomdb_store::StoreError;
use thiserror::Error;

/// Failure persisting or loading a value/chunk-record tree.
#[derive(Debug, Error)]
pub enum ValueError {
    /// A codec failed to serialize or deserialize a chunk.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A backend put/get failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A referenced child hash is unknown to the backend. Fatal during a
    /// strict [`crate::load`]; surfaced on demand from lazy views.
    #[error("chunk missing: {0}")]
    ChunkMissing(String),
    /// A value's kind has no persister arm. Unreachable in practice — the
    /// default `leaf` arm covers every scalar — reserved for strict builds
    /// that want to forbid silent fallthrough.
    #[error("unsupported kind: {0}")]
    UnsupportedKind(String),
}
