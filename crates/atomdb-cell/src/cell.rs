// SPDX-License-Identifier: Apache-2.0
//! The root cell (spec §4.9): a CAS-updatable reference to a single root
//! hash, acting as a mutable entry point into an otherwise immutable
//! Merkle DAG.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use atomdb_cache::ChunkCache;
use atomdb_hash::Hash;
use atomdb_store::ChunkStore;
use atomdb_value::Value;
use atomdb_view::{Backend, ViewValue};
use tracing::{debug, trace};

use crate::error::CellError;

/// A mutable entry point to a content-addressed Merkle DAG.
///
/// The root-hash field is guarded by a [`Mutex`] rather than a lock-free
/// atomic — `Hash` is 32 bytes, too wide for a hardware CAS primitive —
/// but the critical sections here are a single compare-and-copy, so it
/// behaves as the spec's "single word / CAS primitive" in practice (spec
/// §5, §9 "Retry-loop semantics of swap"). `swap`'s update function may be
/// invoked more than once under contention and must be pure.
pub struct Cell {
    backend: Backend,
    root: Mutex<Option<Hash>>,
}

fn unpoison<T>(result: Result<MutexGuard<'_, T>, PoisonError<MutexGuard<'_, T>>>) -> MutexGuard<'_, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}

impl Cell {
    pub(crate) fn from_parts(backend: Backend, root: Mutex<Option<Hash>>) -> Self {
        Self { backend, root }
    }

    fn lock_root(&self) -> MutexGuard<'_, Option<Hash>> {
        unpoison(self.root.lock())
    }

    /// The current root hash, or `None` if the cell has never been
    /// written to (spec §6 `rootHash(cell)`).
    pub fn root_hash(&self) -> Option<Hash> {
        *self.lock_root()
    }

    /// The backing store handle (spec §6 `store(cell)`).
    pub fn store(&self) -> Arc<dyn ChunkStore + Send + Sync> {
        self.backend.store_handle()
    }

    /// The chunk cache handle (spec §6 `cache(cell)`).
    pub fn cache(&self) -> Arc<dyn ChunkCache + Send + Sync> {
        self.backend.cache_handle()
    }

    /// Dereference the current root hash into a lazy view (spec §6
    /// `deref(cell)`). Returns `None` if the root hash is null — no chunk
    /// fetch is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] if the root chunk fails to load.
    pub fn deref(&self) -> Result<Option<ViewValue>, CellError> {
        match self.root_hash() {
            Some(hash) => Ok(Some(self.backend.view_of(hash)?)),
            None => Ok(None),
        }
    }

    /// Persist `value`, atomically replace the root hash, and return
    /// `value` (spec §6 `reset(cell, value)`).
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] if `value` fails to persist.
    pub fn reset(&self, value: Value) -> Result<Value, CellError> {
        let hash = self.backend.put_value(&value)?;
        *self.lock_root() = Some(hash);
        debug!(hash = %hash, "cell reset");
        Ok(value)
    }

    /// Read the current view, compute `f(view)`, persist the result, and
    /// atomically replace the root hash, retrying if another thread moved
    /// the root hash between the read and the write (spec §6
    /// `swap(cell, fn, args…)`).
    ///
    /// `f` must be effectively pure: contention can invoke it more than
    /// once for a single logical swap.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] if the current root fails to load, or if the
    /// computed value fails to persist.
    pub fn swap<F>(&self, mut f: F) -> Result<Value, CellError>
    where
        F: FnMut(Option<&ViewValue>) -> Value,
    {
        loop {
            let observed = self.root_hash();
            let view = match observed {
                Some(hash) => Some(self.backend.view_of(hash)?),
                None => None,
            };
            let next_value = f(view.as_ref());
            let next_hash = self.backend.put_value(&next_value)?;

            let mut guard = self.lock_root();
            if *guard == observed {
                *guard = Some(next_hash);
                debug!(hash = %next_hash, "cell swap committed");
                return Ok(next_value);
            }
            drop(guard);
            trace!("cell swap lost the race, retrying");
        }
    }

    /// If the currently dereferenced value equals `expected` by value
    /// equality, persist `new`, atomically replace the root hash, and
    /// return `true`; otherwise leave the cell untouched and return
    /// `false` (spec §6 `compareAndSet(cell, old, new)`).
    ///
    /// Comparison is by value semantics (materializing the current view as
    /// needed), not by hash, so `expected` can be an ordinary in-memory
    /// value rather than a hash the caller would otherwise have no way to
    /// obtain.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] if the current root fails to load or `new`
    /// fails to persist. A value mismatch is `Ok(false)`, not an error
    /// (spec §7 `CASMismatch`).
    pub fn compare_and_set(&self, expected: &Value, new: Value) -> Result<bool, CellError> {
        loop {
            let observed = self.root_hash();
            let current_value = match observed {
                Some(hash) => self.backend.view_of(hash)?.to_plain()?,
                None => Value::Null,
            };
            if &current_value != expected {
                return Ok(false);
            }

            let new_hash = self.backend.put_value(&new)?;
            let mut guard = self.lock_root();
            if *guard == observed {
                *guard = Some(new_hash);
                debug!(hash = %new_hash, "cell compareAndSet committed");
                return Ok(true);
            }
            drop(guard);
            trace!("cell compareAndSet observed a concurrent change, re-reading");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{open, Config};
    use atomdb_value::Keyword;

    #[test]
    fn deref_of_fresh_cell_is_null() {
        let cell = open(Config::memory()).expect("open");
        assert!(cell.deref().expect("deref").is_none());
    }

    #[test]
    fn reset_then_deref_round_trips() {
        // S1.
        let cell = open(Config::memory()).expect("open");
        let users = Value::Map(vec![(
            Value::Int(1),
            Value::Map(vec![(Value::String("name".into()), Value::String("Alice".into()))]),
        )]);
        let root = Value::Map(vec![(Value::String("users".into()), users)]);
        cell.reset(root).expect("reset");

        let view = cell.deref().expect("deref").expect("present");
        let ViewValue::Map(root_map) = view else { panic!("expected map view") };
        let ViewValue::Map(users_map) =
            root_map.get(&Value::String("users".into())).expect("get").expect("present")
        else {
            panic!("expected map view")
        };
        let ViewValue::Map(alice) =
            users_map.get(&Value::Int(1)).expect("get").expect("present")
        else {
            panic!("expected map view")
        };
        assert_eq!(
            alice.get(&Value::String("name".into())).expect("get"),
            Some(ViewValue::Scalar(Value::String("Alice".into())))
        );
        assert_eq!(cell.root_hash().expect("root hash").to_hex().len(), 64);
    }

    #[test]
    fn swap_ten_times_increments_counter() {
        // S2.
        let cell = open(Config::memory().with_init(Value::Map(vec![(
            Value::Keyword(Keyword::bare("c")),
            Value::Int(0),
        )])))
        .expect("open");

        let mut hashes = Vec::new();
        for _ in 0..10 {
            cell.swap(|view| {
                let ViewValue::Map(map) = view.expect("cell has a root") else {
                    panic!("expected map view")
                };
                let current = match map.get(&Value::Keyword(Keyword::bare("c"))).expect("get") {
                    Some(ViewValue::Scalar(Value::Int(n))) => n,
                    _ => 0,
                };
                Value::Map(vec![(Value::Keyword(Keyword::bare("c")), Value::Int(current + 1))])
            })
            .expect("swap");
            hashes.push(cell.root_hash().expect("root hash"));
        }

        let ViewValue::Map(final_map) = cell.deref().expect("deref").expect("present") else {
            panic!("expected map view")
        };
        assert_eq!(
            final_map.get(&Value::Keyword(Keyword::bare("c"))).expect("get"),
            Some(ViewValue::Scalar(Value::Int(10)))
        );
        hashes.dedup();
        assert_eq!(hashes.len(), 10, "all ten swaps must produce distinct root hashes");
    }

    #[test]
    fn compare_and_set_succeeds_once_then_fails() {
        // S5.
        let cell = open(Config::memory().with_init(Value::Map(vec![(
            Value::String("c".into()),
            Value::Int(0),
        )])))
        .expect("open");

        let old = Value::Map(vec![(Value::String("c".into()), Value::Int(0))]);
        let new = Value::Map(vec![(Value::String("c".into()), Value::Int(1))]);

        assert!(cell.compare_and_set(&old, new.clone()).expect("cas"));
        assert!(!cell.compare_and_set(&old, new.clone()).expect("cas"));

        let view = cell.deref().expect("deref").expect("present");
        assert_eq!(view.to_plain().expect("to_plain"), new);
    }

    #[test]
    fn reset_after_crash_simulated_by_fresh_cell_over_same_store() {
        // S3 (memory variant of the filesystem reopen scenario; the
        // filesystem reopen itself is covered in atomdb-dry-tests).
        let cell = open(Config::memory()).expect("open");
        cell.reset(Value::Map(vec![(
            Value::String("xs".into()),
            Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        )]))
        .expect("reset");
        let root_hash = cell.root_hash().expect("root hash");

        let reopened = Cell::from_parts(
            Backend::new(cell.store(), cell.cache(), Arc::new(atomdb_codec::TextualCodec)),
            Mutex::new(Some(root_hash)),
        );
        let view = reopened.deref().expect("deref").expect("present");
        assert_eq!(
            view.to_plain().expect("to_plain"),
            Value::Map(vec![(
                Value::String("xs".into()),
                Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            )])
        );
    }
}
