// SPDX-License-Identifier: Apache-2.0
//! The map view (spec §4.8): keyed, on-demand access over a persisted map
//! node.

use std::cell::RefCell;
use std::fmt;

use atomdb_hash::Hash;
use atomdb_value::{canonical_bytes, Value};

use crate::backend::Backend;
use crate::convert::ViewValue;
use crate::error::ViewError;

/// A read-only, on-demand view over a persisted map node.
///
/// Keys are held in full — map chunks embed keys directly rather than
/// hashing them (spec §4.6) — while values are loaded on first access and
/// memoized in a local cache private to this view.
#[derive(Clone)]
pub struct MapView {
    backend: Backend,
    node_hash: Hash,
    children: Vec<(Value, Hash)>,
    local: RefCell<Vec<Option<ViewValue>>>,
}

impl fmt::Debug for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapView")
            .field("node_hash", &self.node_hash)
            .field("count", &self.children.len())
            .finish()
    }
}

impl MapView {
    pub(crate) fn new(backend: Backend, node_hash: Hash, children: Vec<(Value, Hash)>) -> Self {
        let local = RefCell::new(vec![None; children.len()]);
        Self { backend, node_hash, children, local }
    }

    /// The hash of the node chunk this view wraps.
    pub fn node_hash(&self) -> Hash {
        self.node_hash
    }

    /// Number of entries, without loading any value (spec §8 property 6).
    pub fn count(&self) -> usize {
        self.children.len()
    }

    /// Keys in the codec's canonical order — the order the node chunk
    /// stores them in.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.children.iter().map(|(k, _)| k)
    }

    fn index_of(&self, key: &Value) -> Option<usize> {
        self.children.iter().position(|(k, _)| k == key)
    }

    fn load_at(&self, index: usize) -> Result<ViewValue, ViewError> {
        if let Some(cached) = self.local.borrow()[index].clone() {
            return Ok(cached);
        }
        let (_, hash) = self.children[index];
        let value = self.backend.view_of(hash)?;
        self.local.borrow_mut()[index] = Some(value.clone());
        Ok(value)
    }

    /// Look up `key`. Absence is answered from the child table alone, with
    /// no load; presence triggers at most one load of the bound value,
    /// memoized for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if `key` is present but its value chunk fails
    /// to load.
    pub fn get(&self, key: &Value) -> Result<Option<ViewValue>, ViewError> {
        match self.index_of(key) {
            Some(index) => self.load_at(index).map(Some),
            None => Ok(None),
        }
    }

    /// `true` if `key` is present, answered from the child table alone.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.index_of(key).is_some()
    }

    /// All entries, each value loaded lazily. Used internally by
    /// conversion; public because callers walking a whole map for display
    /// or iteration need it too.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if any value chunk fails to load.
    pub fn entries(&self) -> Result<Vec<(Value, ViewValue)>, ViewError> {
        self.children
            .iter()
            .enumerate()
            .map(|(i, (k, _))| Ok((k.clone(), self.load_at(i)?)))
            .collect()
    }

    /// Functional update: persist `value`, write a new map node with `key`
    /// bound to it (replacing any existing binding), and return the new
    /// view. `self` is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if `value` fails to persist.
    pub fn assoc(&self, key: Value, value: &Value) -> Result<MapView, ViewError> {
        let value_hash = self.backend.put_value(value)?;
        let mut next = self.children.clone();
        if let Some(slot) = next.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value_hash;
        } else {
            next.push((key, value_hash));
        }
        next.sort_by(|a, b| canonical_bytes(&a.0).cmp(&canonical_bytes(&b.0)));
        self.backend.store_map(next)
    }

    /// Functional update: write a new map node without `key`'s entry. A
    /// no-op (returns a clone of `self`) if `key` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the new node fails to persist.
    pub fn dissoc(&self, key: &Value) -> Result<MapView, ViewError> {
        if !self.contains_key(key) {
            return Ok(self.clone());
        }
        let next: Vec<(Value, Hash)> = self.children.iter().filter(|(k, _)| k != key).cloned().collect();
        self.backend.store_map(next)
    }
}

impl PartialEq for MapView {
    /// Equal when both views denote the same map by value equality
    /// (spec §4.8). Views over the same node hash short-circuit without
    /// loading anything.
    fn eq(&self, other: &Self) -> bool {
        if self.node_hash == other.node_hash {
            return true;
        }
        matches!(
            (ViewValue::Map(self.clone()).to_plain(), ViewValue::Map(other.clone()).to_plain()),
            (Ok(a), Ok(b)) if a == b
        )
    }
}
