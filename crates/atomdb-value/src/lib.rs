// SPDX-License-Identifier: Apache-2.0
//! The AtomDB value model: the [`Value`] tagged variant every runtime value
//! is classified into, the [`ChunkRecord`] schema chunks are written in,
//! and the canonical-form helpers that keep map keys and set members
//! order-independent.
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

mod canonical;
mod record;
mod value;

pub use canonical::{canonical_bytes, structural_hash};
pub use record::{ChunkRecord, Leaf};
pub use value::{Keyword, Value};
