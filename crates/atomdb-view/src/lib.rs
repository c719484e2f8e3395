// SPDX-License-Identifier: Apache-2.0
//! Lazy collection views over AtomDB chunk trees (spec §4.8), plus the
//! conversion back to a fully-materialized value (spec §4.10).
//!
//! A view is a read-only, on-demand wrapper around one node chunk. It
//! holds the node's child table up front — so `count`, and for map/vector
//! `contains`-style checks, never touch the backend — and loads a child's
//! chunk only when something asks for that child, memoizing the result in
//! a local cache private to the view. The shared chunk cache
//! (`atomdb-cache`) still absorbs repeat backend reads across independent
//! views built from the same node.
//!
//! Every "mutation" is functional: `assoc`/`dissoc`/`conj`/`disj`/`cons`
//! persist a new child (if any), write a new node record, and return a new
//! view over it. The view being updated is never touched.
//!
//! Per spec §9, a view's local cache is a plain [`std::cell::RefCell`],
//! not a lock — it is safe to use a view from one thread at a time, but
//! sharing a single view across threads without external synchronization
//! is not supported. Clone a [`Backend`] and build independent views per
//! thread instead; they share the backend's store/cache, just not the
//! local memoization.
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

mod backend;
mod convert;
mod error;
mod list;
mod map;
mod set;
mod vector;

pub use backend::Backend;
pub use convert::ViewValue;
pub use error::ViewError;
pub use list::ListView;
pub use map::MapView;
pub use set::SetView;
pub use vector::VectorView;
