// SPDX-License-Identifier: Apache-2.0
//! `ViewValue` and `toPlain` (spec §4.10): the unifying type returned by
//! dereferencing a node, and its detachment into an ordinary value tree.

use atomdb_value::{structural_hash, Value};

use crate::error::ViewError;
use crate::list::ListView;
use crate::map::MapView;
use crate::set::SetView;
use crate::vector::VectorView;

/// The result of dereferencing a node chunk: a scalar, already fully
/// materialized (scalars have no children to defer), or a lazy view over
/// one of the four collection kinds.
#[derive(Clone, Debug)]
pub enum ViewValue {
    /// A scalar, decoded in full.
    Scalar(Value),
    /// A lazy map view.
    Map(MapView),
    /// A lazy vector view.
    Vector(VectorView),
    /// A lazy list view.
    List(ListView),
    /// A lazy set view.
    Set(SetView),
}

impl ViewValue {
    /// Recursively materialize this view, and every child it reaches,
    /// into a plain, detached [`Value`] tree (spec §4.10).
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if any reachable chunk fails to load.
    pub fn to_plain(&self) -> Result<Value, ViewError> {
        Ok(match self {
            Self::Scalar(value) => value.clone(),
            Self::Map(view) => {
                let entries = view
                    .entries()?
                    .into_iter()
                    .map(|(k, v)| Ok((k, v.to_plain()?)))
                    .collect::<Result<Vec<_>, ViewError>>()?;
                Value::Map(entries)
            }
            Self::Vector(view) => {
                let items = view
                    .elements()?
                    .into_iter()
                    .map(|v| v.to_plain())
                    .collect::<Result<Vec<_>, ViewError>>()?;
                Value::Vector(items)
            }
            Self::List(view) => {
                let items = view
                    .elements()?
                    .into_iter()
                    .map(|v| v.to_plain())
                    .collect::<Result<Vec<_>, ViewError>>()?;
                Value::List(items)
            }
            Self::Set(view) => {
                let mut items = Vec::with_capacity(view.count());
                for item in view.iter() {
                    items.push(item?.to_plain()?);
                }
                Value::Set(items)
            }
        })
    }

    /// Structural hash over this view's fully materialized form, equal to
    /// the hash of the plain value it denotes under the same contract as
    /// `atomdb_value::structural_hash` (spec §4.8 "hash of a view").
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if materializing the view fails.
    pub fn structural_hash(&self) -> Result<u64, ViewError> {
        Ok(structural_hash(&self.to_plain()?))
    }
}

impl PartialEq for ViewValue {
    /// Equality by denoted value (spec §4.8): two views, or a view and a
    /// materialized scalar, are equal exactly when they denote the same
    /// value under the kind's semantic equality.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Vector(a), Self::Vector(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            _ => matches!((self.to_plain(), other.to_plain()), (Ok(a), Ok(b)) if a == b),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use atomdb_cache::NoopCache;
    use atomdb_codec::TextualCodec;
    use atomdb_store::MemoryStore;
    use std::sync::Arc;

    use crate::backend::Backend;

    fn backend() -> Backend {
        Backend::new(Arc::new(MemoryStore::new()), Arc::new(NoopCache::new()), Arc::new(TextualCodec))
    }

    #[test]
    fn nested_collection_round_trips_through_to_plain() {
        let backend = backend();
        let original = Value::Map(vec![(
            Value::String("users".into()),
            Value::Vector(vec![Value::String("alice".into()), Value::String("bob".into())]),
        )]);
        let hash = backend.put_value(&original).expect("persist");
        let view = backend.view_of(hash).expect("view");
        assert_eq!(view.to_plain().expect("to_plain"), original);
    }

    #[test]
    fn structural_hash_matches_plain_value_hash() {
        let backend = backend();
        let original = Value::Vector(vec![Value::Int(1), Value::Int(2)]);
        let hash = backend.put_value(&original).expect("persist");
        let view = backend.view_of(hash).expect("view");
        assert_eq!(view.structural_hash().expect("hash"), structural_hash(&original));
    }

    #[test]
    fn scalar_equals_materialized_scalar() {
        let a = ViewValue::Scalar(Value::Int(7));
        let b = ViewValue::Scalar(Value::Int(7));
        assert_eq!(a, b);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod proptests {
    use super::*;
    use atomdb_cache::NoopCache;
    use atomdb_codec::TextualCodec;
    use atomdb_store::MemoryStore;
    use proptest::prelude::*;
    use std::sync::Arc;

    use crate::backend::Backend;

    fn backend() -> Backend {
        Backend::new(Arc::new(MemoryStore::new()), Arc::new(NoopCache::new()), Arc::new(TextualCodec))
    }

    fn value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Vector),
                prop::collection::vec(inner, 0..4).prop_map(|items| Value::Map(
                    items.into_iter().enumerate().map(|(i, v)| (Value::Int(i as i64), v)).collect()
                )),
            ]
        })
    }

    proptest! {
        #[test]
        fn lazy_view_to_plain_matches_persisted_value(v in value()) {
            let backend = backend();
            let hash = backend.put_value(&v).expect("persist");
            let view = backend.view_of(hash).expect("view");
            prop_assert_eq!(view.to_plain().expect("to_plain"), v);
        }

        #[test]
        fn lazy_view_structural_hash_matches_plain_structural_hash(v in value()) {
            let backend = backend();
            let hash = backend.put_value(&v).expect("persist");
            let view = backend.view_of(hash).expect("view");
            prop_assert_eq!(view.structural_hash().expect("hash"), structural_hash(&v));
        }
    }
}
