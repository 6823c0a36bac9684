// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use super::{EnumDescriptor, FieldDescriptor, FieldKind, ScalarKind, TypeDescriptor};
use std::sync::Arc;

/// Builder for declaring record types.
///
/// ```rust
/// use tapewire::descriptor::{ScalarKind, TypeDescriptorBuilder};
///
/// let order = TypeDescriptorBuilder::new("Order")
///     .scalar_field("qty", ScalarKind::I32, 1)
///     .string_field("account", 2)
///     .symbol_field("instrument", 3)
///     .build();
/// assert_eq!(order.fields().len(), 3);
/// ```
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a record type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add an untagged field (cloned, never serialized).
    pub fn field(mut self, name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    /// Add a tagged field with an explicit member id.
    pub fn field_with_id(mut self, name: impl Into<Arc<str>>, kind: FieldKind, id: u8) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind).with_id(id));
        self
    }

    /// Add a tagged fixed-width scalar field.
    pub fn scalar_field(self, name: impl Into<Arc<str>>, kind: ScalarKind, id: u8) -> Self {
        self.field_with_id(name, FieldKind::Scalar(kind), id)
    }

    /// Add a tagged string field.
    pub fn string_field(self, name: impl Into<Arc<str>>, id: u8) -> Self {
        self.field_with_id(name, FieldKind::Str, id)
    }

    /// Add a tagged domain-symbol field.
    pub fn symbol_field(self, name: impl Into<Arc<str>>, id: u8) -> Self {
        self.field_with_id(name, FieldKind::Symbol, id)
    }

    /// Add a tagged enumeration field.
    pub fn enum_field(self, name: impl Into<Arc<str>>, desc: EnumDescriptor, id: u8) -> Self {
        self.field_with_id(name, FieldKind::Enum(desc), id)
    }

    /// Add a tagged wrapped/cast field (8-byte wire integer, untagged on the
    /// wire but still part of the tagged processing order).
    pub fn wrapped_field(
        self,
        name: impl Into<Arc<str>>,
        wrapped_type: impl Into<Arc<str>>,
        id: u8,
    ) -> Self {
        self.field_with_id(
            name,
            FieldKind::Wrapped {
                type_name: wrapped_type.into(),
            },
            id,
        )
    }

    /// Add a tagged nested-list field.
    pub fn list_field(self, name: impl Into<Arc<str>>, id: u8) -> Self {
        self.field_with_id(name, FieldKind::List, id)
    }

    /// Add an untagged nested-object field.
    pub fn object_field(self, name: impl Into<Arc<str>>) -> Self {
        self.field(name, FieldKind::Object)
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, self.fields)
    }
}
