// SPDX-License-Identifier: Apache-2.0
//! The vector view (spec §4.8): ordered, random-access, positional assoc.

use std::cell::RefCell;
use std::fmt;

use atomdb_hash::Hash;
use atomdb_value::Value;

use crate::backend::Backend;
use crate::convert::ViewValue;
use crate::error::ViewError;

/// A read-only, on-demand view over a persisted vector node.
#[derive(Clone)]
pub struct VectorView {
    backend: Backend,
    node_hash: Hash,
    children: Vec<Hash>,
    local: RefCell<Vec<Option<ViewValue>>>,
}

impl fmt::Debug for VectorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorView")
            .field("node_hash", &self.node_hash)
            .field("count", &self.children.len())
            .finish()
    }
}

impl VectorView {
    pub(crate) fn new(backend: Backend, node_hash: Hash, children: Vec<Hash>) -> Self {
        let local = RefCell::new(vec![None; children.len()]);
        Self { backend, node_hash, children, local }
    }

    /// The hash of the node chunk this view wraps.
    pub fn node_hash(&self) -> Hash {
        self.node_hash
    }

    /// Number of elements, without loading any (spec §8 property 6).
    pub fn count(&self) -> usize {
        self.children.len()
    }

    fn load_at(&self, index: usize) -> Result<ViewValue, ViewError> {
        if let Some(cached) = self.local.borrow()[index].clone() {
            return Ok(cached);
        }
        let hash = self.children[index];
        let value = self.backend.view_of(hash)?;
        self.local.borrow_mut()[index] = Some(value.clone());
        Ok(value)
    }

    /// `nth(i)`. `None` for any `i` outside `0..count`, including negative
    /// indices, without loading anything; otherwise an O(1) load of the
    /// i'th child.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the element is in range but its chunk
    /// fails to load.
    pub fn nth(&self, index: i64) -> Result<Option<ViewValue>, ViewError> {
        let Ok(idx) = usize::try_from(index) else {
            return Ok(None);
        };
        if idx >= self.children.len() {
            return Ok(None);
        }
        self.load_at(idx).map(Some)
    }

    /// All elements, each loaded lazily. Used internally by conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if any element chunk fails to load.
    pub fn elements(&self) -> Result<Vec<ViewValue>, ViewError> {
        (0..self.children.len()).map(|i| self.load_at(i)).collect()
    }

    /// Functional update: `0 <= index <= count`, with `index == count`
    /// appending. Persists `value`, writes a new vector node, and returns
    /// the new view; `self` is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::IndexOutOfRange`] if `index` is negative or
    /// greater than `count`. Returns [`ViewError`] if `value` fails to
    /// persist.
    pub fn assoc(&self, index: i64, value: &Value) -> Result<VectorView, ViewError> {
        let count = self.children.len();
        let Ok(idx) = usize::try_from(index) else {
            return Err(ViewError::IndexOutOfRange { index, count });
        };
        if idx > count {
            return Err(ViewError::IndexOutOfRange { index, count });
        }
        let value_hash = self.backend.put_value(value)?;
        let mut next = self.children.clone();
        if idx == count {
            next.push(value_hash);
        } else {
            next[idx] = value_hash;
        }
        self.backend.vector_view(next)
    }
}

impl PartialEq for VectorView {
    /// Equal when both views denote the same sequence by positional value
    /// equality (spec §4.8). Views over the same node hash short-circuit
    /// without loading anything.
    fn eq(&self, other: &Self) -> bool {
        if self.node_hash == other.node_hash {
            return true;
        }
        matches!(
            (ViewValue::Vector(self.clone()).to_plain(), ViewValue::Vector(other.clone()).to_plain()),
            (Ok(a), Ok(b)) if a == b
        )
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

    fn backend() -> Backend {
        Backend::new(Arc::new(MemoryStore::new()), Arc::new(NoopCache::new()), Arc::new(TextualCodec))
    }

    fn sample() -> Value {
        Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    }

    fn view_of(backend: &Backend, value: &Value) -> VectorView {
        let hash = backend.put_value(value).expect("persist");
        match backend.view_of(hash).expect("view") {
            ViewValue::Vector(view) => Some(view),
            _ => None,
        }
        .expect("expected vector view")
    }

    #[test]
    fn count_matches_element_count() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        assert_eq!(view.count(), 3);
    }

    #[test]
    fn nth_loads_in_range_element() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        assert_eq!(view.nth(1).expect("nth"), Some(ViewValue::Scalar(Value::Int(2))));
    }

    #[test]
    fn nth_out_of_range_is_none() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        assert_eq!(view.nth(3).expect("nth"), None);
        assert_eq!(view.nth(-1).expect("nth"), None);
    }

    #[test]
    fn assoc_in_range_replaces_element() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        let updated = view.assoc(1, &Value::Int(99)).expect("assoc");
        assert_eq!(updated.nth(1).expect("nth"), Some(ViewValue::Scalar(Value::Int(99))));
        assert_eq!(view.nth(1).expect("nth"), Some(ViewValue::Scalar(Value::Int(2))));
    }

    #[test]
    fn assoc_at_count_appends() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        let updated = view.assoc(3, &Value::Int(4)).expect("assoc");
        assert_eq!(updated.count(), 4);
        assert_eq!(updated.nth(3).expect("nth"), Some(ViewValue::Scalar(Value::Int(4))));
    }

    #[test]
    fn assoc_beyond_count_is_out_of_range() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        let err = view.assoc(10, &Value::Int(0)).unwrap_err();
        assert!(matches!(err, ViewError::IndexOutOfRange { index: 10, count: 3 }));
    }

    #[test]
    fn assoc_negative_is_out_of_range() {
        let backend = backend();
        let view = view_of(&backend, &sample());
        let err = view.assoc(-1, &Value::Int(0)).unwrap_err();
        assert!(matches!(err, ViewError::IndexOutOfRange { index: -1, count: 3 }));
    }

    #[test]
    fn to_plain_round_trips() {
        let backend = backend();
        let original = sample();
        let view = view_of(&backend, &original);
        assert_eq!(ViewValue::Vector(view).to_plain().expect("to_plain"), original);
    }
}
