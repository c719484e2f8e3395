// SPDX-License-Identifier: Apache-2.0
//! Errors surfaced by lazy views (spec §7).

use atomdb_persist::ValueError;
use thiserror::Error;

/// Failure reading or functionally updating a lazy view.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Underlying persist/load failure (codec, backend, or a missing
    /// chunk). A missing child surfaces here at the point of access, not
    /// eagerly when the view is constructed.
    #[error(transparent)]
    Value(#[from] ValueError),
    /// A mutation method was called on a view. Views are read-only;
    /// functional update (`assoc`/`dissoc`/`conj`/`disj`) returns a new
    /// view instead of mutating in place.
    #[error("cannot mutate an immutable view")]
    ImmutableView,
    /// A vector/list index was out of `0..=count` range.
    #[error("index {index} out of range for count {count}")]
    IndexOutOfRange {
        /// The offending index.
        index: i64,
        /// The view's element count at the time of the call.
        count: usize,
    },
}
