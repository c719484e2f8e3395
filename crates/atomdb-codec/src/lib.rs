// SPDX-License-Identifier: Apache-2.0
//! Deterministic chunk-record codecs for AtomDB (spec §4.2).
//!
//! A [`Codec`] turns a [`atomdb_value::ChunkRecord`] into bytes and back.
//! Both directions must be total and deterministic: the same record always
//! produces the same bytes, regardless of host hashing seeds or map/set
//! iteration order. `atomdb-hash` hashes whatever bytes a codec emits, so
//! two stores using different codecs are never byte-compatible — that is
//! intentional, not a bug to paper over.
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

mod binary;
mod error;
mod textual;

pub use binary::BinaryCodec;
pub use error::CodecError;
pub use textual::TextualCodec;

use atomdb_value::ChunkRecord;

/// Contract every chunk-record codec implements (spec §4.2).
///
/// `encode`/`decode` operate on a [`ChunkRecord`] tree, not on arbitrary
/// user values — backends store records, never raw `Value`s.
pub trait Codec {
    /// Serialize `record` to bytes. Deterministic: equal records always
    /// produce byte-identical output.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be represented.
    fn encode(&self, record: &ChunkRecord) -> Result<Vec<u8>, CodecError>;

    /// Reconstruct a [`ChunkRecord`] from bytes previously produced by
    /// [`encode`](Codec::encode).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if `bytes` is not a valid encoding.
    fn decode(&self, bytes: &[u8]) -> Result<ChunkRecord, CodecError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use atomdb_hash::hash_bytes;
    use atomdb_value::Leaf;

    fn sample_records() -> Vec<ChunkRecord> {
        let h = hash_bytes(b"child");
        vec![
            ChunkRecord::Leaf(Leaf::Null),
            ChunkRecord::Leaf(Leaf::Int(42)),
            ChunkRecord::Bool { value: false },
            ChunkRecord::Str { value: "hi".into() },
            ChunkRecord::Vector { children: vec![h] },
            ChunkRecord::Set { children: vec![h] },
        ]
    }

    fn assert_round_trips(codec: &dyn Codec) {
        for record in sample_records() {
            let bytes = codec.encode(&record).expect("encode");
            let back = codec.decode(&bytes).expect("decode");
            assert_eq!(format!("{back:?}"), format!("{record:?}"));
        }
    }

    #[test]
    fn textual_round_trips() {
        assert_round_trips(&TextualCodec);
    }

    #[test]
    fn binary_round_trips() {
        assert_round_trips(&BinaryCodec);
    }

    #[test]
    fn codecs_are_not_byte_compatible() {
        let record = ChunkRecord::Str { value: "cross-codec".into() };
        let textual = TextualCodec.encode(&record).expect("encode");
        let binary = BinaryCodec.encode(&record).expect("encode");
        assert_ne!(textual, binary);
    }
}
