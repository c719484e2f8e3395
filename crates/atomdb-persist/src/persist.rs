// SPDX-License-Identifier: Apache-2.0
//! The Persister: recursive decomposition of a `Value` into chunks
//! (spec §4.6).

use atomdb_codec::{Codec, CodecError};
use atomdb_hash::Hash;
use atomdb_store::ChunkStore;
use atomdb_value::{canonical_bytes, ChunkRecord, Leaf, Value};
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;

use crate::error::ValueError;

/// Recursively decompose `value` into chunks and return the hash of its
/// root chunk (spec §4.6).
///
/// Collections are processed children-first: every element is persisted
/// before the collection's own node is assembled and stored, so every
/// child-hash in a written node already resolves in the backend (spec
/// invariant I2). Persisting an already-present subtree is a no-op beyond
/// recomputing its hash, by the backend's put-idempotence (I5).
///
/// # Errors
///
/// Returns [`ValueError::Codec`] if a chunk fails to serialize, or
/// [`ValueError::Store`] if the backend rejects a write. A failure aborts
/// the current node; already-written child chunks are left in place
/// (orphans are acceptable — spec §4.6, no GC).
pub fn persist<S, C>(store: &S, codec: &C, value: &Value) -> Result<Hash, ValueError>
where
    S: ChunkStore + ?Sized,
    C: Codec + ?Sized,
{
    let record = build_record(store, codec, value)?;
    store_record(store, codec, &record)
}

fn store_record<S, C>(store: &S, codec: &C, record: &ChunkRecord) -> Result<Hash, ValueError>
where
    S: ChunkStore + ?Sized,
    C: Codec + ?Sized,
{
    let bytes = codec.encode(record)?;
    Ok(store.put(&bytes)?)
}

fn format_timestamp(t: time::OffsetDateTime) -> Result<String, ValueError> {
    t.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| ValueError::Codec(CodecError::encode(format!("bad timestamp: {e}"))))
}

fn build_record<S, C>(store: &S, codec: &C, value: &Value) -> Result<ChunkRecord, ValueError>
where
    S: ChunkStore + ?Sized,
    C: Codec + ?Sized,
{
    Ok(match value {
        Value::Null => ChunkRecord::Leaf(Leaf::Null),
        Value::Int(i) => ChunkRecord::Leaf(Leaf::Int(*i)),
        Value::Float(f) => ChunkRecord::Leaf(Leaf::Float(*f)),
        Value::Bool(b) => ChunkRecord::Bool { value: *b },
        Value::BigDec(s) => ChunkRecord::BigDec { value: s.clone() },
        Value::Ratio(s) => ChunkRecord::Ratio { value: s.clone() },
        Value::String(s) => ChunkRecord::Str { value: s.clone() },
        Value::Symbol(s) => ChunkRecord::Symbol { value: s.clone() },
        Value::Keyword(kw) => ChunkRecord::Keyword(kw.clone()),
        Value::Uuid(u) => ChunkRecord::Uuid { value: u.to_string() },
        Value::Timestamp(t) => ChunkRecord::Date { value: format_timestamp(*t)? },
        Value::Map(entries) => {
            let mut children = Vec::with_capacity(entries.len());
            for (key, val) in entries {
                let hash = persist(store, codec, val)?;
                children.push((key.clone(), hash));
            }
            // Codec-canonical key order (spec §4.6 Ordering).
            children.sort_by(|a, b| canonical_bytes(&a.0).cmp(&canonical_bytes(&b.0)));
            ChunkRecord::Map { children }
        }
        Value::Vector(items) => {
            let children = items
                .iter()
                .map(|item| persist(store, codec, item))
                .collect::<Result<Vec<_>, _>>()?;
            ChunkRecord::Vector { children }
        }
        Value::List(items) => {
            let children = items
                .iter()
                .map(|item| persist(store, codec, item))
                .collect::<Result<Vec<_>, _>>()?;
            ChunkRecord::List { children }
        }
        Value::Set(items) => {
            // Stable sort by each member's own canonical byte form, computed
            // before persistence, so equal sets hash identically regardless
            // of insertion order (spec §4.6 Ordering, tested by S4).
            let mut ordered: Vec<&Value> = items.iter().collect();
            ordered.sort_by(|a, b| canonical_bytes(a).cmp(&canonical_bytes(b)));
            let children = ordered
                .into_iter()
                .map(|item| persist(store, codec, item))
                .collect::<Result<Vec<_>, _>>()?;
            ChunkRecord::Set { children }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use atomdb_codec::TextualCodec;
    use atomdb_store::MemoryStore;
    use atomdb_value::Keyword;

    #[test]
    fn scalar_persists_deterministically() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let a = persist(&store, &codec, &Value::String("hello".into())).expect("persist");
        let b = persist(&store, &codec, &Value::String("hello".into())).expect("persist");
        assert_eq!(a, b);
    }

    #[test]
    fn equal_maps_hash_equal_regardless_of_entry_order() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let a = Value::Map(vec![
            (Value::String("a".into()), Value::Int(1)),
            (Value::String("b".into()), Value::Int(2)),
        ]);
        let b = Value::Map(vec![
            (Value::String("b".into()), Value::Int(2)),
            (Value::String("a".into()), Value::Int(1)),
        ]);
        let ha = persist(&store, &codec, &a).expect("persist");
        let hb = persist(&store, &codec, &b).expect("persist");
        assert_eq!(ha, hb);
    }

    #[test]
    fn equal_sets_hash_equal_regardless_of_insertion_order() {
        // S4.
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let a = Value::Set(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::Set(vec![Value::Int(3), Value::Int(2), Value::Int(1)]);
        let ha = persist(&store, &codec, &a).expect("persist");
        let hb = persist(&store, &codec, &b).expect("persist");
        assert_eq!(ha, hb);
    }

    #[test]
    fn distinct_vectors_hash_differently() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let a = Value::Vector(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::Vector(vec![Value::Int(2), Value::Int(1)]);
        let ha = persist(&store, &codec, &a).expect("persist");
        let hb = persist(&store, &codec, &b).expect("persist");
        assert_ne!(ha, hb);
    }

    #[test]
    fn structural_sharing_keeps_unchanged_children() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        let original = Value::Map(vec![
            (Value::String("name".into()), Value::String("Alice".into())),
            (Value::String("age".into()), Value::Int(30)),
        ]);
        let updated = original
            .assoc(Value::String("age".into()), Value::Int(31))
            .expect("map");

        persist(&store, &codec, &original).expect("persist");
        let root = persist(&store, &codec, &updated).expect("persist");

        let bytes = store.get(&root).expect("get").expect("present");
        let record = codec.decode(&bytes).expect("decode");
        let children = match record {
            ChunkRecord::Map { children } => Some(children),
            _ => None,
        }
        .expect("root record must be a map");
        let name_hash = children
            .iter()
            .find(|(k, _)| *k == Value::String("name".into()))
            .map(|(_, h)| *h)
            .expect("name child present");
        let expected_name_hash =
            persist(&store, &codec, &Value::String("Alice".into())).expect("persist");
        assert_eq!(name_hash, expected_name_hash);
    }

    #[test]
    fn keyword_persists() {
        let store = MemoryStore::new();
        let codec = TextualCodec;
        persist(&store, &codec, &Value::Keyword(Keyword::namespaced("user", "name")))
            .expect("persist");
    }
}
