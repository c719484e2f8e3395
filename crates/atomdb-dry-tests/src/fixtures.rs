// SPDX-License-Identifier: Apache-2.0
//! Sample `Value` trees covering every scalar and collection kind, for
//! tests that need a representative value without hand-rolling one.

use atomdb_value::{Keyword, Value};
use time::OffsetDateTime;

/// One instance of every scalar kind in spec.md §3, in a fixed order.
pub fn every_scalar_kind() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Bool(true),
        Value::Int(-42),
        Value::Float(3.5),
        Value::BigDec("123456789012345678901234.5".into()),
        Value::Ratio("22/7".into()),
        Value::String("hello, atomdb".into()),
        Value::Symbol("my-symbol".into()),
        Value::Keyword(Keyword::bare("bare-keyword")),
        Value::Keyword(Keyword::namespaced("user", "name")),
        Value::Uuid(uuid::Uuid::nil()),
        Value::Timestamp(OffsetDateTime::UNIX_EPOCH),
    ]
}

/// A small nested map/vector/list/set tree exercising structural sharing:
/// `"tags"` and `"scores"` below share no structure, but persisting this
/// twice must reuse every chunk (spec invariant I5).
pub fn nested_user_record() -> Value {
    Value::Map(vec![
        (Value::String("name".into()), Value::String("Alice".into())),
        (Value::String("age".into()), Value::Int(30)),
        (
            Value::String("tags".into()),
            Value::Set(vec![
                Value::Keyword(Keyword::bare("admin")),
                Value::Keyword(Keyword::bare("beta-tester")),
            ]),
        ),
        (
            Value::String("scores".into()),
            Value::Vector(vec![Value::Int(10), Value::Int(20), Value::Int(30)]),
        ),
        (
            Value::String("history".into()),
            Value::List(vec![Value::String("signed-up".into()), Value::String("verified".into())]),
        ),
    ])
}

/// A map keyed by non-string values (ints and keywords), to exercise the
/// canonical-form ordering rules rather than the common string-key case.
pub fn map_with_complex_keys() -> Value {
    Value::Map(vec![
        (Value::Int(1), Value::String("one".into())),
        (Value::Keyword(Keyword::bare("two")), Value::String("two".into())),
        (Value::Bool(true), Value::String("true-key".into())),
    ])
}
