// SPDX-License-Identifier: Apache-2.0
//! Human-readable self-describing codec: a small s-expression grammar with
//! stable key ordering and canonical numeric forms (spec §4.2, §6).

use crate::error::CodecError;
use crate::Codec;
use atomdb_hash::Hash;
use atomdb_value::{ChunkRecord, Keyword, Leaf, Value};

/// Textual codec. Output is UTF-8, whitespace-stable, human-readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextualCodec;

impl Codec for TextualCodec {
    fn encode(&self, record: &ChunkRecord) -> Result<Vec<u8>, CodecError> {
        let mut out = String::new();
        write_record(record, &mut out);
        Ok(out.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<ChunkRecord, CodecError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CodecError::decode(format!("not utf-8: {e}")))?;
        let mut parser = Parser::new(text);
        let record = parser.parse_record()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(CodecError::decode("trailing data after record"));
        }
        Ok(record)
    }
}

// ---------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------

fn write_qstr(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn write_hash(out: &mut String, h: &Hash) {
    out.push_str(&h.to_hex());
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => {
            out.push_str("(int ");
            out.push_str(&i.to_string());
            out.push(')');
        }
        Value::Float(f) => {
            out.push_str("(float ");
            out.push_str(&format!("{f:?}"));
            out.push(')');
        }
        Value::BigDec(s) => {
            out.push_str("(bigdec ");
            write_qstr(out, s);
            out.push(')');
        }
        Value::Ratio(s) => {
            out.push_str("(ratio ");
            write_qstr(out, s);
            out.push(')');
        }
        Value::String(s) => {
            out.push_str("(string ");
            write_qstr(out, s);
            out.push(')');
        }
        Value::Symbol(s) => {
            out.push_str("(symbol ");
            write_qstr(out, s);
            out.push(')');
        }
        Value::Keyword(kw) => {
            out.push_str("(keyword ");
            match &kw.ns {
                Some(ns) => write_qstr(out, ns),
                None => out.push_str("nil"),
            }
            out.push(' ');
            write_qstr(out, &kw.name);
            out.push(')');
        }
        Value::Uuid(u) => {
            out.push_str("(uuid ");
            write_qstr(out, &u.to_string());
            out.push(')');
        }
        Value::Timestamp(t) => {
            out.push_str("(date ");
            write_qstr(out, &t.unix_timestamp_nanos().to_string());
            out.push(')');
        }
        Value::Map(entries) => {
            out.push_str("(map");
            let mut sorted: Vec<&(Value, Value)> = entries.iter().collect();
            sorted.sort_by(|a, b| {
                atomdb_value::canonical_bytes(&a.0).cmp(&atomdb_value::canonical_bytes(&b.0))
            });
            for (k, v) in sorted {
                out.push_str(" (");
                write_value(k, out);
                out.push(' ');
                write_value(v, out);
                out.push(')');
            }
            out.push(')');
        }
        Value::Vector(items) => {
            out.push_str("(vector");
            for item in items {
                out.push(' ');
                write_value(item, out);
            }
            out.push(')');
        }
        Value::List(items) => {
            out.push_str("(list");
            for item in items {
                out.push(' ');
                write_value(item, out);
            }
            out.push(')');
        }
        Value::Set(items) => {
            out.push_str("(set");
            let mut sorted: Vec<&Value> = items.iter().collect();
            sorted.sort_by(|a, b| atomdb_value::canonical_bytes(a).cmp(&atomdb_value::canonical_bytes(b)));
            for item in sorted {
                out.push(' ');
                write_value(item, out);
            }
            out.push(')');
        }
    }
}

fn write_record(record: &ChunkRecord, out: &mut String) {
    match record {
        ChunkRecord::Leaf(Leaf::Null) => out.push_str("(leaf nil)"),
        ChunkRecord::Leaf(Leaf::Int(i)) => {
            out.push_str("(leaf int ");
            out.push_str(&i.to_string());
            out.push(')');
        }
        ChunkRecord::Leaf(Leaf::Float(f)) => {
            out.push_str("(leaf float ");
            out.push_str(&format!("{f:?}"));
            out.push(')');
        }
        ChunkRecord::Bool { value } => {
            out.push_str("(bool ");
            out.push_str(if *value { "true" } else { "false" });
            out.push(')');
        }
        ChunkRecord::BigDec { value } => {
            out.push_str("(bigdec ");
            write_qstr(out, value);
            out.push(')');
        }
        ChunkRecord::Ratio { value } => {
            out.push_str("(ratio ");
            write_qstr(out, value);
            out.push(')');
        }
        ChunkRecord::Str { value } => {
            out.push_str("(string ");
            write_qstr(out, value);
            out.push(')');
        }
        ChunkRecord::Symbol { value } => {
            out.push_str("(symbol ");
            write_qstr(out, value);
            out.push(')');
        }
        ChunkRecord::Keyword(Keyword { ns, name }) => {
            out.push_str("(keyword ");
            match ns {
                Some(ns) => write_qstr(out, ns),
                None => out.push_str("nil"),
            }
            out.push(' ');
            write_qstr(out, name);
            out.push(')');
        }
        ChunkRecord::Uuid { value } => {
            out.push_str("(uuid ");
            write_qstr(out, value);
            out.push(')');
        }
        ChunkRecord::Date { value } => {
            out.push_str("(date ");
            write_qstr(out, value);
            out.push(')');
        }
        ChunkRecord::Map { children } => {
            out.push_str("(map");
            for (key, hash) in children {
                out.push_str(" (");
                write_value(key, out);
                out.push(' ');
                write_hash(out, hash);
                out.push(')');
            }
            out.push(')');
        }
        ChunkRecord::Vector { children } => {
            out.push_str("(vector");
            for h in children {
                out.push(' ');
                write_hash(out, h);
            }
            out.push(')');
        }
        ChunkRecord::List { children } => {
            out.push_str("(list");
            for h in children {
                out.push(' ');
                write_hash(out, h);
            }
            out.push(')');
        }
        ChunkRecord::Set { children } => {
            out.push_str("(set");
            for h in children {
                out.push(' ');
                write_hash(out, h);
            }
            out.push(')');
        }
    }
}

// ---------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    _src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { chars: src.chars().collect(), pos: 0, _src: src }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CodecError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(CodecError::decode(format!("expected '{expected}', found '{c}'"))),
            None => Err(CodecError::decode(format!("expected '{expected}', found end of input"))),
        }
    }

    /// Parse one whitespace/paren-delimited atom: a quoted string (returned
    /// unescaped) or a bare token.
    fn parse_atom(&mut self) -> Result<String, CodecError> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.parse_qstr(),
            Some(_) => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '(' && c != ')') {
                    self.pos += 1;
                }
                if self.pos == start {
                    return Err(CodecError::decode("expected atom"));
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            None => Err(CodecError::decode("expected atom, found end of input")),
        }
    }

    fn parse_qstr(&mut self) -> Result<String, CodecError> {
        self.expect('"')?;
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some('n') => s.push('\n'),
                    Some(other) => s.push(other),
                    None => return Err(CodecError::decode("unterminated escape")),
                },
                Some(c) => s.push(c),
                None => return Err(CodecError::decode("unterminated string")),
            }
        }
        Ok(s)
    }

    /// Parse a value literal: used both for top-level reading of nested
    /// values (map keys) and, recursively, inside collections.
    fn parse_value(&mut self) -> Result<Value, CodecError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.expect('(')?;
                self.skip_ws();
                let tag = self.parse_bare_tag()?;
                let value = match tag.as_str() {
                    "int" => {
                        let tok = self.parse_atom()?;
                        let i: i64 = tok.parse().map_err(|_| CodecError::decode("bad int"))?;
                        Value::Int(i)
                    }
                    "float" => {
                        let tok = self.parse_atom()?;
                        let f: f64 = tok.parse().map_err(|_| CodecError::decode("bad float"))?;
                        Value::Float(f)
                    }
                    "bigdec" => Value::BigDec(self.parse_atom()?),
                    "ratio" => Value::Ratio(self.parse_atom()?),
                    "string" => Value::String(self.parse_atom()?),
                    "symbol" => Value::Symbol(self.parse_atom()?),
                    "keyword" => {
                        self.skip_ws();
                        let ns = if self.peek_bare_is("nil") {
                            self.parse_bare_tag()?;
                            None
                        } else {
                            Some(self.parse_atom()?)
                        };
                        let name = self.parse_atom()?;
                        Value::Keyword(Keyword { ns, name })
                    }
                    "uuid" => {
                        let tok = self.parse_atom()?;
                        let u = uuid::Uuid::parse_str(&tok)
                            .map_err(|e| CodecError::decode(format!("bad uuid: {e}")))?;
                        Value::Uuid(u)
                    }
                    "date" => {
                        let tok = self.parse_atom()?;
                        let nanos: i128 =
                            tok.parse().map_err(|_| CodecError::decode("bad date"))?;
                        let t = time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
                            .map_err(|e| CodecError::decode(format!("bad date: {e}")))?;
                        Value::Timestamp(t)
                    }
                    "map" => {
                        let mut entries = Vec::new();
                        loop {
                            self.skip_ws();
                            if self.peek() == Some(')') {
                                break;
                            }
                            self.expect('(')?;
                            let key = self.parse_value()?;
                            let val = self.parse_value()?;
                            self.skip_ws();
                            self.expect(')')?;
                            entries.push((key, val));
                        }
                        Value::Map(entries)
                    }
                    "vector" => Value::Vector(self.parse_value_seq()?),
                    "list" => Value::List(self.parse_value_seq()?),
                    "set" => Value::Set(self.parse_value_seq()?),
                    other => return Err(CodecError::decode(format!("unknown value tag '{other}'"))),
                };
                self.skip_ws();
                self.expect(')')?;
                Ok(value)
            }
            Some(_) => {
                let tok = self.parse_bare_tag()?;
                match tok.as_str() {
                    "nil" => Ok(Value::Null),
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    other => Err(CodecError::decode(format!("unexpected token '{other}'"))),
                }
            }
            None => Err(CodecError::decode("expected value, found end of input")),
        }
    }

    fn parse_value_seq(&mut self) -> Result<Vec<Value>, CodecError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(')') {
                break;
            }
            items.push(self.parse_value()?);
        }
        Ok(items)
    }

    fn peek_bare_is(&self, word: &str) -> bool {
        let rest: String = self.chars[self.pos..].iter().collect();
        rest.starts_with(word)
            && rest[word.len()..].chars().next().map_or(true, |c| c.is_whitespace() || c == ')')
    }

    /// A bare (unquoted) identifier token, e.g. a record/value tag or `nil`.
    fn parse_bare_tag(&mut self) -> Result<String, CodecError> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '(' && c != ')') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(CodecError::decode("expected tag"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_hash(&mut self) -> Result<Hash, CodecError> {
        let tok = self.parse_atom()?;
        Hash::from_hex(&tok).ok_or_else(|| CodecError::decode(format!("bad hash '{tok}'")))
    }

    fn parse_hash_seq(&mut self) -> Result<Vec<Hash>, CodecError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(')') {
                break;
            }
            items.push(self.parse_hash()?);
        }
        Ok(items)
    }

    fn parse_record(&mut self) -> Result<ChunkRecord, CodecError> {
        self.skip_ws();
        self.expect('(')?;
        let tag = self.parse_bare_tag()?;
        let record = match tag.as_str() {
            "leaf" => {
                self.skip_ws();
                if self.peek_bare_is("nil") {
                    self.parse_bare_tag()?;
                    ChunkRecord::Leaf(Leaf::Null)
                } else {
                    let kind = self.parse_bare_tag()?;
                    match kind.as_str() {
                        "int" => {
                            let tok = self.parse_atom()?;
                            let i: i64 =
                                tok.parse().map_err(|_| CodecError::decode("bad int"))?;
                            ChunkRecord::Leaf(Leaf::Int(i))
                        }
                        "float" => {
                            let tok = self.parse_atom()?;
                            let f: f64 =
                                tok.parse().map_err(|_| CodecError::decode("bad float"))?;
                            ChunkRecord::Leaf(Leaf::Float(f))
                        }
                        other => {
                            return Err(CodecError::decode(format!("unknown leaf kind '{other}'")))
                        }
                    }
                }
            }
            "bool" => {
                let tok = self.parse_bare_tag()?;
                let value = match tok.as_str() {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(CodecError::decode(format!("bad bool '{other}'")))
                    }
                };
                ChunkRecord::Bool { value }
            }
            "bigdec" => ChunkRecord::BigDec { value: self.parse_atom()? },
            "ratio" => ChunkRecord::Ratio { value: self.parse_atom()? },
            "string" => ChunkRecord::Str { value: self.parse_atom()? },
            "symbol" => ChunkRecord::Symbol { value: self.parse_atom()? },
            "keyword" => {
                self.skip_ws();
                let ns = if self.peek_bare_is("nil") {
                    self.parse_bare_tag()?;
                    None
                } else {
                    Some(self.parse_atom()?)
                };
                let name = self.parse_atom()?;
                ChunkRecord::Keyword(Keyword { ns, name })
            }
            "uuid" => ChunkRecord::Uuid { value: self.parse_atom()? },
            "date" => ChunkRecord::Date { value: self.parse_atom()? },
            "map" => {
                let mut children = Vec::new();
                loop {
                    self.skip_ws();
                    if self.peek() == Some(')') {
                        break;
                    }
                    self.expect('(')?;
                    let key = self.parse_value()?;
                    let hash = self.parse_hash()?;
                    self.skip_ws();
                    self.expect(')')?;
                    children.push((key, hash));
                }
                ChunkRecord::Map { children }
            }
            "vector" => ChunkRecord::Vector { children: self.parse_hash_seq()? },
            "list" => ChunkRecord::List { children: self.parse_hash_seq()? },
            "set" => ChunkRecord::Set { children: self.parse_hash_seq()? },
            other => return Err(CodecError::decode(format!("unknown record tag '{other}'"))),
        };
        self.skip_ws();
        self.expect(')')?;
        Ok(record)
    }
}
