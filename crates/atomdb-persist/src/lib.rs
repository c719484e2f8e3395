// SPDX-License-Identifier: Apache-2.0
//! The Persister and Loader (spec §4.6, §4.7): turning an
//! `atomdb_value::Value` tree into content-addressed chunks, and back.
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

mod error;
mod load;
mod persist;

pub use error::ValueError;
pub use load::load;
pub use persist::persist;
