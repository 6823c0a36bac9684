// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime field values.

use crate::descriptor::FieldKind;
use crate::record::SharedRecord;
use crate::symbol::Symbol;
use std::sync::Arc;

/// Nanoseconds since the Unix epoch, carried as an 8-byte wire integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

/// Signed nanosecond span, carried as an 8-byte wire integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub i64);

/// A runtime value held in a record slot.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Nullable string. `None` and `Some("")` are distinct on the wire.
    Str(Option<String>),
    /// Raw enumeration value; variant names live in the descriptor.
    Enum(i64),
    /// Nullable interned domain symbol.
    Symbol(Option<Symbol>),
    Time(Timestamp),
    Span(Duration),
    /// Ordered list of records; element types may differ at runtime.
    List(Vec<SharedRecord>),
    /// Nullable nested record reference.
    Object(Option<SharedRecord>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
            Self::Enum(_) => "enum",
            Self::Symbol(_) => "symbol",
            Self::Time(_) => "timestamp",
            Self::Span(_) => "duration",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Blank value for a declared field kind, used when a record is
    /// allocated without running any constructor logic.
    pub fn default_for(kind: &FieldKind) -> Value {
        match kind {
            FieldKind::Scalar(k) => Self::default_scalar(*k),
            FieldKind::Enum(e) => Value::Enum(e.variants.first().map_or(0, |v| v.value)),
            FieldKind::Str => Value::Str(None),
            FieldKind::Symbol => Value::Symbol(None),
            FieldKind::Wrapped { type_name } => {
                if &**type_name == "Duration" {
                    Value::Span(Duration(0))
                } else {
                    Value::Time(Timestamp(0))
                }
            }
            FieldKind::List => Value::List(Vec::new()),
            FieldKind::Object => Value::Object(None),
        }
    }

    fn default_scalar(kind: crate::descriptor::ScalarKind) -> Value {
        use crate::descriptor::ScalarKind as K;
        match kind {
            K::Bool => Value::Bool(false),
            K::U8 => Value::U8(0),
            K::U16 => Value::U16(0),
            K::U32 => Value::U32(0),
            K::U64 => Value::U64(0),
            K::I8 => Value::I8(0),
            K::I16 => Value::I16(0),
            K::I32 => Value::I32(0),
            K::I64 => Value::I64(0),
            K::F32 => Value::F32(0.0),
            K::F64 => Value::F64(0.0),
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string; `None` for null strings and non-strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Try to get as symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list.
    pub fn as_list(&self) -> Option<&[SharedRecord]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

// List/Object compare by pointer identity first, then through their lock.
// Aliased nodes (including self-referential cycles) short-circuit; two
// structurally equal but fully disjoint cyclic graphs must not be compared.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Span(a), Self::Span(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| Arc::ptr_eq(x, y) || *x.read() == *y.read())
            }
            (Self::Object(a), Self::Object(b)) => match (a, b) {
                (None, None) => true,
                (Some(x), Some(y)) => Arc::ptr_eq(x, y) || *x.read() == *y.read(),
                _ => false,
            },
            _ => false,
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Some(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Some(v.to_string()))
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        Self::Str(v)
    }
}

impl From<Symbol> for Value {
    fn from(v: Symbol) -> Self {
        Self::Symbol(Some(v))
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Self::Time(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Self::Span(v)
    }
}

impl From<Vec<SharedRecord>> for Value {
    fn from(v: Vec<SharedRecord>) -> Self {
        Self::List(v)
    }
}
