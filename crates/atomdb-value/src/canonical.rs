// SPDX-License-Identifier: Apache-2.0
//! Canonical byte form for a [`Value`], used to order map keys and set
//! members deterministically (spec §4.6, §9 "Map-key representation").
//!
//! This is a comparison/ordering key, not a wire format — `atomdb-codec`
//! owns the actual on-disk bytes. Every recursive step is length-prefixed
//! so distinct trees never collide by concatenation.

use crate::value::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash as StdHash, Hasher};

fn write_len(buf: &mut Vec<u8>, len: usize) {
    #[allow(clippy::cast_possible_truncation)]
    buf.extend_from_slice(&(len as u32).to_be_bytes());
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    write_len(buf, s.len());
    buf.extend_from_slice(s.as_bytes());
}

fn write_nested(buf: &mut Vec<u8>, nested: &[u8]) {
    write_len(buf, nested.len());
    buf.extend_from_slice(nested);
}

/// Compute the canonical byte form of `value`.
///
/// Equal values (by [`Value`]'s `PartialEq`, which is order-independent for
/// maps and sets) always produce identical canonical bytes, because map
/// entries and set members are themselves sorted by their own canonical
/// bytes before encoding.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_canonical(value, &mut buf);
    buf
}

#[allow(clippy::cast_sign_loss)]
fn write_canonical(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Null => buf.push(0),
        Value::Bool(b) => {
            buf.push(1);
            buf.push(u8::from(*b));
        }
        Value::Int(i) => {
            buf.push(2);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        Value::Float(f) => {
            buf.push(3);
            buf.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Value::BigDec(s) => {
            buf.push(4);
            write_str(buf, s);
        }
        Value::Ratio(s) => {
            buf.push(5);
            write_str(buf, s);
        }
        Value::String(s) => {
            buf.push(6);
            write_str(buf, s);
        }
        Value::Symbol(s) => {
            buf.push(7);
            write_str(buf, s);
        }
        Value::Keyword(kw) => {
            buf.push(8);
            write_len(buf, usize::from(kw.ns.is_some()));
            if let Some(ns) = &kw.ns {
                write_str(buf, ns);
            }
            write_str(buf, &kw.name);
        }
        Value::Uuid(u) => {
            buf.push(9);
            buf.extend_from_slice(u.as_bytes());
        }
        Value::Timestamp(t) => {
            buf.push(10);
            buf.extend_from_slice(&t.unix_timestamp_nanos().to_be_bytes());
        }
        Value::Map(entries) => {
            buf.push(11);
            let mut canon: Vec<(Vec<u8>, Vec<u8>)> = entries
                .iter()
                .map(|(k, v)| (canonical_bytes(k), canonical_bytes(v)))
                .collect();
            canon.sort_by(|a, b| a.0.cmp(&b.0));
            write_len(buf, canon.len());
            for (k, v) in canon {
                write_nested(buf, &k);
                write_nested(buf, &v);
            }
        }
        Value::Vector(items) => {
            buf.push(12);
            write_len(buf, items.len());
            for item in items {
                write_nested(buf, &canonical_bytes(item));
            }
        }
        Value::List(items) => {
            buf.push(13);
            write_len(buf, items.len());
            for item in items {
                write_nested(buf, &canonical_bytes(item));
            }
        }
        Value::Set(items) => {
            buf.push(14);
            let mut canon: Vec<Vec<u8>> = items.iter().map(canonical_bytes).collect();
            canon.sort();
            write_len(buf, canon.len());
            for item in canon {
                write_nested(buf, &item);
            }
        }
    }
}

/// Structural hash of a value, independent of the host's hashing seed and
/// of the content-addressing hash used to store chunks.
///
/// Used so that `view.structural_hash() == plain.structural_hash()` holds
/// for equivalent lazy views and materialized values (spec §9 "Hash of
/// scalar values").
pub fn structural_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    canonical_bytes(value).hash(&mut hasher);
    hasher.finish()
}
