// SPDX-License-Identifier: Apache-2.0
//! The store/cache/codec handle every lazy view is built on.

use std::sync::Arc;

use atomdb_cache::ChunkCache;
use atomdb_codec::Codec;
use atomdb_hash::Hash;
use atomdb_persist::ValueError;
use atomdb_store::ChunkStore;
use atomdb_value::{ChunkRecord, Leaf, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::ViewError;
use crate::list::ListView;
use crate::map::MapView;
use crate::set::SetView;
use crate::vector::VectorView;
use crate::ViewValue;

/// A runtime-selected store/cache/codec triple shared by every view and
/// root cell built from one `open(config)` call (spec §6).
///
/// Cheap to clone: the three handles are reference-counted, so every view
/// spawned from a node shares the same backend instance rather than
/// re-wrapping it.
#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn ChunkStore + Send + Sync>,
    cache: Arc<dyn ChunkCache + Send + Sync>,
    codec: Arc<dyn Codec + Send + Sync>,
}

impl Backend {
    /// Bundle a store, cache, and codec into a shared handle.
    pub fn new(
        store: Arc<dyn ChunkStore + Send + Sync>,
        cache: Arc<dyn ChunkCache + Send + Sync>,
        codec: Arc<dyn Codec + Send + Sync>,
    ) -> Self {
        Self { store, cache, codec }
    }

    /// The underlying store handle (spec §6 `store(cell)`).
    pub fn store_handle(&self) -> Arc<dyn ChunkStore + Send + Sync> {
        self.store.clone()
    }

    /// The underlying cache handle (spec §6 `cache(cell)`).
    pub fn cache_handle(&self) -> Arc<dyn ChunkCache + Send + Sync> {
        self.cache.clone()
    }

    fn fetch_bytes(&self, hash: &Hash) -> Result<Vec<u8>, ViewError> {
        if let Some(bytes) = self.cache.get(hash) {
            return Ok(bytes);
        }
        let bytes = self
            .store
            .get(hash)
            .map_err(ValueError::from)?
            .ok_or_else(|| ValueError::ChunkMissing(hash.to_hex()))?;
        self.cache.put(*hash, bytes.clone());
        Ok(bytes)
    }

    fn fetch_record(&self, hash: &Hash) -> Result<ChunkRecord, ViewError> {
        let bytes = self.fetch_bytes(hash)?;
        self.codec.decode(&bytes).map_err(ValueError::from).map_err(ViewError::from)
    }

    /// Persist `value` through this backend's store/codec, returning its
    /// hash. Used by every view's functional-update method, and by
    /// `atomdb-cell`'s `reset`/`swap`/`compareAndSet`.
    pub fn put_value(&self, value: &Value) -> Result<Hash, ViewError> {
        atomdb_persist::persist(&*self.store, &*self.codec, value).map_err(ViewError::from)
    }

    /// Strictly, eagerly materialize the full value tree rooted at `hash`.
    /// Used where a view needs an actual `Value` to compute a canonical
    /// form (set ordering) rather than a fresh lazy wrapper.
    pub(crate) fn materialize(&self, hash: &Hash) -> Result<Value, ViewError> {
        atomdb_persist::load(&*self.store, &*self.codec, hash).map_err(ViewError::from)
    }

    /// Fetch the node chunk at `hash` and wrap it as a [`ViewValue`]:
    /// scalars are decoded in full, collections become lazy views sharing
    /// this backend. Used internally by every view and by `atomdb-cell`'s
    /// `deref`.
    pub fn view_of(&self, hash: Hash) -> Result<ViewValue, ViewError> {
        let record = self.fetch_record(&hash)?;
        self.wrap_record(hash, record)
    }

    fn wrap_record(&self, hash: Hash, record: ChunkRecord) -> Result<ViewValue, ViewError> {
        Ok(match record {
            ChunkRecord::Map { children } => ViewValue::Map(MapView::new(self.clone(), hash, children)),
            ChunkRecord::Vector { children } => {
                ViewValue::Vector(VectorView::new(self.clone(), hash, children))
            }
            ChunkRecord::List { children } => ViewValue::List(ListView::new(self.clone(), hash, children)),
            ChunkRecord::Set { children } => ViewValue::Set(SetView::new(self.clone(), hash, children)),
            scalar => ViewValue::Scalar(scalar_from_record(&scalar)?),
        })
    }

    /// Encode and store a freshly assembled map node, returning the new
    /// view.
    pub(crate) fn store_map(&self, children: Vec<(Value, Hash)>) -> Result<MapView, ViewError> {
        let record = ChunkRecord::Map { children: children.clone() };
        let hash = self.store_record(&record)?;
        Ok(MapView::new(self.clone(), hash, children))
    }

    /// Encode and store a freshly assembled vector node, returning the new
    /// view.
    pub(crate) fn vector_view(&self, children: Vec<Hash>) -> Result<VectorView, ViewError> {
        let record = ChunkRecord::Vector { children: children.clone() };
        let hash = self.store_record(&record)?;
        Ok(VectorView::new(self.clone(), hash, children))
    }

    /// Encode and store a freshly assembled list node, returning the new
    /// view.
    pub(crate) fn list_view(&self, children: Vec<Hash>) -> Result<ListView, ViewError> {
        let record = ChunkRecord::List { children: children.clone() };
        let hash = self.store_record(&record)?;
        Ok(ListView::new(self.clone(), hash, children))
    }

    /// Encode and store a freshly assembled set node, returning the new
    /// view.
    pub(crate) fn set_view(&self, children: Vec<Hash>) -> Result<SetView, ViewError> {
        let record = ChunkRecord::Set { children: children.clone() };
        let hash = self.store_record(&record)?;
        Ok(SetView::new(self.clone(), hash, children))
    }

    fn store_record(&self, record: &ChunkRecord) -> Result<Hash, ViewError> {
        let bytes = self.codec.encode(record).map_err(ValueError::from)?;
        self.store.put(&bytes).map_err(ValueError::from).map_err(ViewError::from)
    }
}

fn scalar_from_record(record: &ChunkRecord) -> Result<Value, ViewError> {
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
        ChunkRecord::Map { .. } | ChunkRecord::Vector { .. } | ChunkRecord::List { .. } | ChunkRecord::Set { .. } => {
            return Err(
                ValueError::UnsupportedKind("collection record passed to scalar conversion".into())
                    .into(),
            );
        }
    })
}
