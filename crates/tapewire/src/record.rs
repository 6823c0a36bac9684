// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record container: one typed instance, slot-indexed by declaration order.

use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::symbol::Symbol;
use crate::value::{Duration, Timestamp, Value};
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to a record; list elements and nested objects use this so
/// object graphs (including cyclic ones) can alias.
pub type SharedRecord = Arc<RwLock<Record>>;

/// A typed instance: descriptor plus one value per declared field.
///
/// Slots align with `descriptor.fields()`, so compiled field ops address
/// values by index without name lookups.
#[derive(Debug, Clone)]
pub struct Record {
    descriptor: Arc<TypeDescriptor>,
    slots: Vec<Value>,
}

impl Record {
    /// Allocate a blank instance: every slot holds the default value for its
    /// declared kind, with no constructor logic run. Decode and clone both
    /// write into targets created this way.
    pub fn blank(descriptor: &Arc<TypeDescriptor>) -> Self {
        let slots = descriptor
            .fields()
            .iter()
            .map(|f| Value::default_for(&f.kind))
            .collect();
        Self {
            descriptor: Arc::clone(descriptor),
            slots,
        }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    /// Slot value by index. Panics on a bad index; indices come from the
    /// owning descriptor.
    pub(crate) fn slot(&self, index: usize) -> &Value {
        &self.slots[index]
    }

    pub(crate) fn set_slot(&mut self, index: usize, value: Value) {
        self.slots[index] = value;
    }

    /// Field value by name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.descriptor.field_index(name).map(|i| &self.slots[i])
    }

    /// Set a raw field value by name.
    pub fn set_value(&mut self, name: &str, value: Value) -> CodecResult<()> {
        let index =
            self.descriptor
                .field_index(name)
                .ok_or_else(|| CodecError::FieldNotFound {
                    type_name: self.type_name().to_string(),
                    field: name.to_string(),
                })?;
        self.slots[index] = value;
        Ok(())
    }

    /// Typed field read.
    pub fn get<T: FromValue>(&self, name: &str) -> CodecResult<T> {
        let value = self.value(name).ok_or_else(|| CodecError::FieldNotFound {
            type_name: self.type_name().to_string(),
            field: name.to_string(),
        })?;
        T::from_value(name, value)
    }

    /// Typed field write.
    pub fn set<T: IntoValue>(&mut self, name: &str, value: T) -> CodecResult<()> {
        self.set_value(name, value.into_value())
    }

    /// Wrap into the shared-graph handle.
    pub fn into_shared(self) -> SharedRecord {
        Arc::new(RwLock::new(self))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name() == other.descriptor.name() && self.slots == other.slots
    }
}

/// Conversion out of a record slot.
pub trait FromValue: Sized {
    fn from_value(field: &str, value: &Value) -> CodecResult<Self>;
}

/// Conversion into a record slot.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(field: &str, value: &Value) -> CodecResult<Self> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(CodecError::TypeMismatch {
                        field: field.to_string(),
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u8, U8, "u8");
impl_from_value!(u16, U16, "u16");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");
impl_from_value!(Timestamp, Time, "timestamp");
impl_from_value!(Duration, Span, "duration");

impl FromValue for String {
    fn from_value(field: &str, value: &Value) -> CodecResult<Self> {
        match value {
            Value::Str(Some(s)) => Ok(s.clone()),
            other => Err(CodecError::TypeMismatch {
                field: field.to_string(),
                expected: "string".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

impl FromValue for Option<String> {
    fn from_value(field: &str, value: &Value) -> CodecResult<Self> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(CodecError::TypeMismatch {
                field: field.to_string(),
                expected: "string".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

impl FromValue for Symbol {
    fn from_value(field: &str, value: &Value) -> CodecResult<Self> {
        match value {
            Value::Symbol(Some(s)) => Ok(s.clone()),
            other => Err(CodecError::TypeMismatch {
                field: field.to_string(),
                expected: "symbol".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

macro_rules! impl_into_value {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_into_value!(bool, Bool);
impl_into_value!(u8, U8);
impl_into_value!(u16, U16);
impl_into_value!(u32, U32);
impl_into_value!(u64, U64);
impl_into_value!(i8, I8);
impl_into_value!(i16, I16);
impl_into_value!(i32, I32);
impl_into_value!(i64, I64);
impl_into_value!(f32, F32);
impl_into_value!(f64, F64);
impl_into_value!(Timestamp, Time);
impl_into_value!(Duration, Span);

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(Some(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(Some(self.to_string()))
    }
}

impl IntoValue for Option<String> {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for Symbol {
    fn into_value(self) -> Value {
        Value::Symbol(Some(self))
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}
