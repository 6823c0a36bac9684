// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the runtime declaration a codec is compiled from.
//!
//! A [`TypeDescriptor`] lists a type's declared fields in declaration order.
//! Fields carrying a member id participate in the wire format; untagged
//! fields are visible to the deep-cloner only. Descriptors are immutable once
//! built and shared behind `Arc` by the registry, compiled codecs, and
//! records.

mod builder;

pub use builder::TypeDescriptorBuilder;

use crate::error::{CodecError, CodecResult};
use std::sync::Arc;

/// Fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ScalarKind {
    /// Payload width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Enumeration variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub value: i64,
}

impl EnumVariant {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Enumeration descriptor with a declared storage width.
///
/// The width is taken from the declaration as-is; widths other than 1/2/4/8
/// bytes are rejected when the codec is compiled, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub variants: Vec<EnumVariant>,
    /// Storage width on the wire, in bytes (default 4).
    pub width: u8,
}

impl EnumDescriptor {
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants, width: 4 }
    }

    pub fn with_width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// A field's storage category; derived once at declaration, immutable.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Fixed-width scalar, 1/2/4/8-byte little-endian payload.
    Scalar(ScalarKind),
    /// Enumeration stored at its declared width.
    Enum(EnumDescriptor),
    /// Nullable string, UTF-16 payload with byte-length prefix.
    Str,
    /// Interned domain symbol, wire form is its canonical string.
    Symbol,
    /// Value carried as an 8-byte wire integer through a named conversion.
    /// Written without a member id byte.
    Wrapped { type_name: Arc<str> },
    /// Ordered list of records, runtime-dispatched per element.
    List,
    /// Nested record reference. Clonable, but has no field codec: compiling
    /// a wire codec for a type with an `Object` field fails.
    Object,
}

impl FieldKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(k) => k.name(),
            Self::Enum(_) => "enum",
            Self::Str => "string",
            Self::Symbol => "symbol",
            Self::Wrapped { .. } => "wrapped",
            Self::List => "list",
            Self::Object => "object",
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: Arc<str>,
    pub kind: FieldKind,
    /// Wire member id. `None` keeps the field off the wire entirely.
    pub member_id: Option<u8>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            member_id: None,
        }
    }

    pub fn with_id(mut self, id: u8) -> Self {
        self.member_id = Some(id);
        self
    }
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    name: Arc<str>,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<Arc<str>>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// All declared fields, declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Get field slot index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }

    /// Tagged fields with their slot index.
    ///
    /// Wire processing order is this iteration order: the declaration order
    /// of tagged fields, NOT numeric member-id order.
    pub fn tagged_fields(&self) -> impl Iterator<Item = (usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.member_id.is_some())
    }

    /// Validate the declaration for codec use.
    ///
    /// Fails when no field carries a member id, or when two fields share one.
    pub fn validate(&self) -> CodecResult<()> {
        let mut seen = [false; 256];
        let mut tagged = 0usize;
        for field in &self.fields {
            if let Some(id) = field.member_id {
                if seen[id as usize] {
                    return Err(CodecError::Schema {
                        type_name: self.name.to_string(),
                        reason: format!("duplicate member id {} on field '{}'", id, field.name),
                    });
                }
                seen[id as usize] = true;
                tagged += 1;
            }
        }
        if tagged == 0 {
            return Err(CodecError::Schema {
                type_name: self.name.to_string(),
                reason: "no tagged fields".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_widths() {
        assert_eq!(ScalarKind::Bool.width(), 1);
        assert_eq!(ScalarKind::U16.width(), 2);
        assert_eq!(ScalarKind::I32.width(), 4);
        assert_eq!(ScalarKind::F64.width(), 8);
    }

    #[test]
    fn test_enum_descriptor_lookup() {
        let desc = EnumDescriptor::new(vec![
            EnumVariant::new("BUY", 1),
            EnumVariant::new("SELL", 2),
        ]);
        assert_eq!(desc.variant("SELL").map(|v| v.value), Some(2));
        assert_eq!(desc.variant_by_value(1).map(|v| v.name.as_str()), Some("BUY"));
        assert!(desc.variant_by_value(9).is_none());
        assert_eq!(desc.width, 4);
        assert_eq!(desc.with_width(1).width, 1);
    }

    #[test]
    fn test_validate_requires_tagged_field() {
        let desc = TypeDescriptor::new(
            "Untagged",
            vec![FieldDescriptor::new("x", FieldKind::Scalar(ScalarKind::I32))],
        );
        let err = desc.validate().unwrap_err();
        match err {
            CodecError::Schema { type_name, reason } => {
                assert_eq!(type_name, "Untagged");
                assert_eq!(reason, "no tagged fields");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let desc = TypeDescriptor::new(
            "Dup",
            vec![
                FieldDescriptor::new("a", FieldKind::Scalar(ScalarKind::U8)).with_id(3),
                FieldDescriptor::new("b", FieldKind::Str).with_id(3),
            ],
        );
        assert!(matches!(
            desc.validate(),
            Err(CodecError::Schema { .. })
        ));
    }

    #[test]
    fn test_tagged_order_is_declaration_order() {
        let desc = TypeDescriptor::new(
            "Mixed",
            vec![
                FieldDescriptor::new("later_id", FieldKind::Scalar(ScalarKind::U8)).with_id(9),
                FieldDescriptor::new("shadow", FieldKind::Object),
                FieldDescriptor::new("earlier_id", FieldKind::Str).with_id(1),
            ],
        );
        let order: Vec<_> = desc.tagged_fields().map(|(_, f)| &*f.name).collect();
        assert_eq!(order, vec!["later_id", "earlier_id"]);
        let slots: Vec<_> = desc.tagged_fields().map(|(i, _)| i).collect();
        assert_eq!(slots, vec![0, 2]);
    }
}
