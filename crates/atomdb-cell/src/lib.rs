// SPDX-License-Identifier: Apache-2.0
//! The root cell (spec §4.9) and `open(config)` facade (spec §6): the
//! entry point most callers reach for first.
//!
//! ```
//! use atomdb_cell::{open, Config};
//! use atomdb_value::Value;
//!
//! let cell = open(Config::memory().with_init(Value::Int(0))).expect("open");
//! cell.swap(|view| match view {
//!     Some(atomdb_view::ViewValue::Scalar(Value::Int(n))) => Value::Int(n + 1),
//!     _ => Value::Int(0),
//! }).expect("swap");
//! ```
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

mod cell;
mod config;
mod error;

pub use cell::Cell;
pub use config::{open, CacheKind, CodecKind, Config, StoreKind};
pub use error::CellError;

// Re-exported so `use atomdb_cell::*` covers the shapes callers need to
// drive the end-to-end scenarios in spec.md §8 without a separate
// `atomdb-view`/`atomdb-value` dependency.
pub use atomdb_value::{Keyword, Value};
pub use atomdb_view::ViewValue;
