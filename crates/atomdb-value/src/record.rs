// SPDX-License-Identifier: Apache-2.0
//! The `ChunkRecord` schema — the tagged node shape actually written to a
//! backend (spec §3). Collections reference children by [`Hash`], except
//! map keys, which are retained as full [`Value`]s (spec §4.6).

use crate::value::{Keyword, Value};
use atomdb_hash::Hash;

/// A scalar not covered by a dedicated chunk tag: integers, floats, null.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Leaf {
    /// Absence of a value.
    Null,
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
}

/// A tagged node as written to the backing store.
///
/// Every variant corresponds to one row of the tag table in spec §3.
#[derive(Clone, Debug)]
pub enum ChunkRecord {
    /// `map` — children keyed by full value, not hash (spec §4.6).
    Map {
        /// Entries in codec-canonical key order.
        children: Vec<(Value, Hash)>,
    },
    /// `vector` — ordered sequence of child hashes.
    Vector {
        /// Children in positional order.
        children: Vec<Hash>,
    },
    /// `list` — ordered sequence of child hashes (front-extension kind).
    List {
        /// Children in positional order.
        children: Vec<Hash>,
    },
    /// `set` — child hashes ordered by the canonical byte form of the
    /// member value (spec §4.6), not by hash, so equal sets hash
    /// identically regardless of insertion order.
    Set {
        /// Children sorted by their member's canonical byte form.
        children: Vec<Hash>,
    },
    /// `keyword` — optional namespace plus required local name.
    Keyword(Keyword),
    /// `symbol`.
    Symbol {
        /// Symbol text.
        value: String,
    },
    /// `string`.
    Str {
        /// String contents.
        value: String,
    },
    /// `uuid` — canonical textual form.
    Uuid {
        /// Canonical UUID text.
        value: String,
    },
    /// `date` — ISO-8601 instant, UTC.
    Date {
        /// ISO-8601 text.
        value: String,
    },
    /// `bigdec` — textual big-decimal.
    BigDec {
        /// Decimal text.
        value: String,
    },
    /// `ratio` — textual `"n/d"`.
    Ratio {
        /// Ratio text.
        value: String,
    },
    /// `bool`.
    Bool {
        /// Boolean value.
        value: bool,
    },
    /// `leaf` — any scalar not covered above.
    Leaf(Leaf),
}

impl ChunkRecord {
    /// The wire tag name for this record's shape, matching spec §3's table.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Map { .. } => "map",
            Self::Vector { .. } => "vector",
            Self::List { .. } => "list",
            Self::Set { .. } => "set",
            Self::Keyword(_) => "keyword",
            Self::Symbol { .. } => "symbol",
            Self::Str { .. } => "string",
            Self::Uuid { .. } => "uuid",
            Self::Date { .. } => "date",
            Self::BigDec { .. } => "bigdec",
            Self::Ratio { .. } => "ratio",
            Self::Bool { .. } => "bool",
            Self::Leaf(_) => "leaf",
        }
    }

    /// Child hashes referenced by this record, in storage order.
    ///
    /// For `map` records this yields only the value-side hashes — keys are
    /// not chunks, they're values embedded directly in the node.
    pub fn child_hashes(&self) -> Vec<Hash> {
        match self {
            Self::Map { children } => children.iter().map(|(_, h)| *h).collect(),
            Self::Vector { children } | Self::List { children } | Self::Set { children } => {
                children.clone()
            }
            _ => Vec::new(),
        }
    }
}
