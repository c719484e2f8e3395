// SPDX-License-Identifier: Apache-2.0
//! Content hashing for AtomDB chunks.
//!
//! [`Hash`] identifies a chunk by the SHA-256 digest of its serialized byte
//! form. The hash is computed over whatever bytes a codec emits, not over
//! some codec-independent canonical form — two stores using different
//! codecs are not byte-compatible, and that's by design (see `atomdb-codec`).
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

use sha2::{Digest, Sha256};
use std::fmt;

/// A 64-character lowercase hex SHA-256 digest identifying a chunk.
///
/// Identity of a chunk is defined by this hash alone (spec invariant I1).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as a 64-character lowercase hex string.
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Parse a 64-character lowercase hex string back into a [`Hash`].
    ///
    /// Returns `None` if the string is not exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut out = [0u8; 32];
        for (i, chunk) in out.iter_mut().enumerate() {
            *chunk = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(out))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Compute the SHA-256 hash of `bytes`.
///
/// Deterministic and total: the same bytes always produce the same hash,
/// regardless of host hashing seeds.
pub fn hash_bytes(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Hash(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = hash_bytes(b"hello atomdb");
        let b = hash_bytes(b"hello atomdb");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_inputs_distinct_hashes() {
        let a = hash_bytes(b"hello");
        let b = hash_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_round_trip() {
        let h = hash_bytes(b"round trip me");
        let hex = h.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert_eq!(Hash::from_hex(&hex), Some(h));
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        assert_eq!(Hash::from_hex("abcd"), None);
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let bad = "g".repeat(64);
        assert_eq!(Hash::from_hex(&bad), None);
    }

    #[test]
    fn empty_input_is_well_defined() {
        let h = hash_bytes(b"");
        assert_eq!(
            h.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85"
        );
    }
}
