// SPDX-License-Identifier: Apache-2.0
//! The list view (spec §4.8): the same child-table shape as the vector
//! view, but `cons` prepends instead of appending.

use std::cell::RefCell;
use std::fmt;

use atomdb_hash::Hash;
use atomdb_value::Value;

use crate::backend::Backend;
use crate::convert::ViewValue;
use crate::error::ViewError;

/// A read-only, on-demand view over a persisted list node.
#[derive(Clone)]
pub struct ListView {
    backend: Backend,
    node_hash: Hash,
    children: Vec<Hash>,
    local: RefCell<Vec<Option<ViewValue>>>,
}

impl fmt::Debug for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListView")
            .field("node_hash", &self.node_hash)
            .field("count", &self.children.len())
            .finish()
    }
}

impl ListView {
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

    /// Prepend `value`: persists it, writes a new list node whose first
    /// child is the freshly persisted hash followed by the existing
    /// children, and returns the new view; `self` is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if `value` fails to persist.
    pub fn cons(&self, value: &Value) -> Result<ListView, ViewError> {
        let value_hash = self.backend.put_value(value)?;
        let mut next = Vec::with_capacity(self.children.len() + 1);
        next.push(value_hash);
        next.extend(self.children.iter().copied());
        self.backend.list_view(next)
    }
}

impl PartialEq for ListView {
    /// Equal when both views denote the same sequence by positional value
    /// equality (spec §4.8). Views over the same node hash short-circuit
    /// without loading anything.
    fn eq(&self, other: &Self) -> bool {
        if self.node_hash == other.node_hash {
            return true;
        }
        matches!(
            (ViewValue::List(self.clone()).to_plain(), ViewValue::List(other.clone()).to_plain()),
            (Ok(a), Ok(b)) if a == b
        )
    }
}
