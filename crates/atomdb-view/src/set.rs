// SPDX-License-Identifier: Apache-2.0
//! The set view (spec §4.8): unordered, duplicate-free, hash-identified
//! membership.

use std::cell::RefCell;
use std::fmt;

use atomdb_hash::Hash;
use atomdb_value::{canonical_bytes, Value};

use crate::backend::Backend;
use crate::convert::ViewValue;
use crate::error::ViewError;

/// A read-only, on-demand view over a persisted set node.
#[derive(Clone)]
pub struct SetView {
    backend: Backend,
    node_hash: Hash,
    children: Vec<Hash>,
    local: RefCell<Vec<Option<ViewValue>>>,
}

impl fmt::Debug for SetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetView")
            .field("node_hash", &self.node_hash)
            .field("count", &self.children.len())
            .finish()
    }
}

impl SetView {
    pub(crate) fn new(backend: Backend, node_hash: Hash, children: Vec<Hash>) -> Self {
        let local = RefCell::new(vec![None; children.len()]);
        Self { backend, node_hash, children, local }
    }

    /// The hash of the node chunk this view wraps.
    pub fn node_hash(&self) -> Hash {
        self.node_hash
    }

    /// Number of members, without loading any (spec §8 property 6).
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

    /// Iterate members, each loaded lazily.
    pub fn iter(&self) -> impl Iterator<Item = Result<ViewValue, ViewError>> + '_ {
        (0..self.children.len()).map(move |i| self.load_at(i))
    }

    /// `true` if a member equal to `value` is present.
    ///
    /// A pure read (spec §4.8): materializes each existing member and
    /// compares its canonical byte form against `value`'s, without
    /// persisting anything.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if an existing member fails to load.
    pub fn contains(&self, value: &Value) -> Result<bool, ViewError> {
        let target = canonical_bytes(value);
        for hash in &self.children {
            if canonical_bytes(&self.backend.materialize(hash)?) == target {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Functional update: add `value` if not already present. Checks
    /// containment first so a duplicate never produces a second chunk
    /// reference for an equal member, then re-derives the canonical child
    /// order (spec §4.6 Ordering) by loading every member, so the result
    /// hashes identically to a set built directly by the persister.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if `value` fails to persist or an existing
    /// member fails to load while re-deriving order.
    pub fn conj(&self, value: &Value) -> Result<SetView, ViewError> {
        let candidate_hash = self.backend.put_value(value)?;
        if self.children.contains(&candidate_hash) {
            return Ok(self.clone());
        }
        let mut next = self.children.clone();
        next.push(candidate_hash);
        let ordered = self.canonical_order(&next)?;
        self.backend.set_view(ordered)
    }

    /// Functional update: remove a member equal to `value`, searching and
    /// comparing by canonical byte form via a pure read — `value` is never
    /// persisted (spec §4.8). A no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if an existing member fails to load while
    /// searching, or if the rebuilt node fails to persist.
    pub fn disj(&self, value: &Value) -> Result<SetView, ViewError> {
        let target = canonical_bytes(value);
        let mut next = Vec::with_capacity(self.children.len());
        let mut removed = false;
        for hash in &self.children {
            if !removed && canonical_bytes(&self.backend.materialize(hash)?) == target {
                removed = true;
                continue;
            }
            next.push(*hash);
        }
        if !removed {
            return Ok(self.clone());
        }
        self.backend.set_view(next)
    }

    fn canonical_order(&self, hashes: &[Hash]) -> Result<Vec<Hash>, ViewError> {
        let mut paired: Vec<(Vec<u8>, Hash)> = hashes
            .iter()
            .map(|h| self.backend.materialize(h).map(|v| (canonical_bytes(&v), *h)))
            .collect::<Result<_, _>>()?;
        paired.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(paired.into_iter().map(|(_, h)| h).collect())
    }
}

impl PartialEq for SetView {
    /// Equal when both views denote the same set by member equality
    /// (spec §4.8). Views over the same node hash short-circuit without
    /// loading anything.
    fn eq(&self, other: &Self) -> bool {
        if self.node_hash == other.node_hash {
            return true;
        }
        matches!(
            (ViewValue::Set(self.clone()).to_plain(), ViewValue::Set(other.clone()).to_plain()),
            (Ok(a), Ok(b)) if a == b
        )
    }
}
