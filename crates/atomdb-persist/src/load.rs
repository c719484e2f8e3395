// SPDX-License-Identifier: Apache-2.0
//! The Loader: strict, eager reconstruction of a `Value` tree from a
//! chunk hash (spec §4.7). The semantic reference against which the lazy
//! views in `atomdb-view` are checked for equivalence.

use atomdb_codec::Codec;
use atomdb_hash::Hash;
use atomdb_store::ChunkStore;
use atomdb_value::{ChunkRecord, Leaf, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::ValueError;

/// Recursively materialize the full value tree rooted at `hash`, loading
/// every referenced child through `store`/`codec` (spec §4.7).
///
/// A missing child hash is a fatal error naming the hash — unlike lazy
/// views, the strict loader has no notion of a partially materialized
/// result.
///
/// # Errors
///
/// Returns [`ValueError::ChunkMissing`] if `hash` or any descendant hash
/// is unknown to `store`, or [`ValueError::Codec`] if a chunk's bytes do
/// not decode.
pub fn load<S, C>(store: &S, codec: &C, hash: &Hash) -> Result<Value, ValueError>
where
    S: ChunkStore + ?Sized,
    C: Codec + ?Sized,
{
    let bytes = store
        .get(hash)?
        .ok_or_else(|| ValueError::ChunkMissing(hash.to_hex()))?;
    let record = codec.decode(&bytes)?;
    load_record(store, codec, &record)
}

fn load_record<S, C>(store: &S, codec: &C, record: &ChunkRecord) -> Result<Value, ValueError>
where
    S: ChunkStore + ?Sized,
    C: Codec + ?Sized,
{
    Ok(match record {
        ChunkRecord::Leaf(Leaf::Null) => Value::Null,
        ChunkRecord::Leaf(Leaf::Int(i)) => Value::Int(*i),
        ChunkRecord::Leaf(Leaf::Float(f)) => Value::Float(*f),
        ChunkRecord::Bool { value } => Value::Bool(*value),
        ChunkRecord::BigDec { value } => Value::BigDec(value.clone()),
        ChunkRecord::Ratio { value } => Value::Ratio(value.clone()),
        ChunkRecord::Str { value } => Value::String(value.clone()),
        ChunkRecord::Symbol { value } => Value::Symbol(value.clone()),
        ChunkRecord::Keyword(kw) => Value::Keyword(kw.clone()),
        ChunkRecord::Uuid { value } => Value::Uuid(
            uuid::Uuid::parse_str(value)
                .map_err(|e| ValueError::UnsupportedKind(format!("bad uuid '{value}': {e}")))?,
        ),
        ChunkRecord::Date { value } => Value::Timestamp(
            OffsetDateTime::parse(value, &Rfc3339)
                .map_err(|e| ValueError::UnsupportedKind(format!("bad date '{value}': {e}")))?,
        ),
        ChunkRecord::Map { children } => {
            let mut entries = Vec::with_capacity(children.len());
            for (key, hash) in children {
                let value = load(store, codec, hash)?;
                entries.push((key.clone(), value));
            }
            Value::Map(entries)
        }
        ChunkRecord::Vector { children } => Value::Vector(load_all(store, codec, children)?),
        ChunkRecord::List { children } => Value::List(load_all(store, codec, children)?),
        ChunkRecord::Set { children } => Value::Set(load_all(store, codec, children)?),
    })
}

fn load_all<S, C>(store: &S, codec: &C, hashes: &[Hash]) -> Result<Vec<Value>, ValueError>
where
    S: ChunkStore + ?Sized,
    C: Codec + ?Sized,
{
    hashes.iter().map(|h| load(store, codec, h)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::persist::persist;
    use atomdb_codec::TextualCodec;
    use atomdb_store::MemoryStore;
    use atomdb_value::Keyword;

    fn round_trip(value: &Value) -> Value {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let hash = persist(&store, &codec, value).expect("persist");
        load(&store, &codec, &hash).expect("load")
    }

    #[test]
    fn scalar_round_trips() {
        let original = Value::String("round trip".into());
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn nested_collection_round_trips() {
        let original = Value::Map(vec![(
            Value::String("users".into()),
            Value::Map(vec![(
                Value::Int(1),
                Value::Map(vec![(Value::String("name".into()), Value::String("Alice".into()))]),
            )]),
        )]);
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn every_scalar_kind_round_trips() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let samples = vec![
            Value::Null,
            Value::Bool(true),
            Value::Int(-7),
            Value::Float(1.5),
            Value::BigDec("123.456".into()),
            Value::Ratio("1/3".into()),
            Value::String("hi".into()),
            Value::Symbol("sym".into()),
            Value::Keyword(Keyword::namespaced("user", "name")),
            Value::Uuid(uuid::Uuid::nil()),
            Value::Timestamp(OffsetDateTime::UNIX_EPOCH),
        ];
        for sample in samples {
            let hash = persist(&store, &codec, &sample).expect("persist");
            let loaded = load(&store, &codec, &hash).expect("load");
            assert_eq!(loaded, sample);
        }
    }

    #[test]
    fn missing_root_hash_is_fatal() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let unknown = atomdb_hash::hash_bytes(b"never persisted");
        let err = load(&store, &codec, &unknown).unwrap_err();
        assert!(matches!(err, ValueError::ChunkMissing(_)));
    }

    #[test]
    fn missing_child_hash_is_fatal() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let bogus = atomdb_hash::hash_bytes(b"absent child");
        let record = ChunkRecord::Vector { children: vec![bogus] };
        let bytes = codec.encode(&record).expect("encode");
        let hash = atomdb_store::ChunkStore::put(&store, &bytes).expect("put");
        let err = load(&store, &codec, &hash).unwrap_err();
        assert!(matches!(err, ValueError::ChunkMissing(_)));
    }
}
