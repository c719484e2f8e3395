// SPDX-License-Identifier: Apache-2.0
//! Codec error type.

use thiserror::Error;

/// Failure encoding or decoding a [`atomdb_value::ChunkRecord`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Serialization failed. `path` names the offending value, when known.
    #[error("encode error{}: {message}", path.as_ref().map(|p| format!(" at {p}")).unwrap_or_default())]
    Encode {
        /// Human-readable failure description.
        message: String,
        /// Path to the offending value, if the caller supplied one.
        path: Option<String>,
    },
    /// Deserialization failed: the bytes were not a valid record of this
    /// codec's format.
    #[error("decode error{}: {message}", path.as_ref().map(|p| format!(" at {p}")).unwrap_or_default())]
    Decode {
        /// Human-readable failure description.
        message: String,
        /// Path to the offending value, if the caller supplied one.
        path: Option<String>,
    },
}

impl CodecError {
    /// Build an [`CodecError::Encode`] with no path context.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode { message: message.into(), path: None }
    }

    /// Build an [`CodecError::Decode`] with no path context.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into(), path: None }
    }
}
