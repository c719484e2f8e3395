// SPDX-License-Identifier: Apache-2.0
//! Errors surfaced by the root cell (spec §7).

use atomdb_view::ViewError;
use thiserror::Error;

/// Failure dereferencing or mutating a root cell.
///
/// `compareAndSet`'s mismatch case is not represented here — spec §7 is
/// explicit that `CASMismatch` is a returned `false`, not an error value.
#[derive(Debug, Error)]
pub enum CellError {
    /// Underlying view/persist/load failure.
    #[error(transparent)]
    View(#[from] ViewError),
}
