// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! tapewire - runtime-compiled binary codecs for record types.
//!
//! Types are declared at runtime as [`TypeDescriptor`]s: named fields, each
//! with a storage kind and an optional one-byte wire member id. The first
//! time a type is serialized, the [`CodecRegistry`] compiles it into a
//! [`CompiledCodec`], a dispatch table of per-field encode/decode/length
//! functions; every later call reuses the compiled form. A parallel
//! [`Cloner`] service compiles per-type deep-clone plans that handle shared
//! references and cyclic record graphs.
//!
//! The wire format is dense little-endian: each tagged field is its member
//! id byte followed by the payload, in declaration order, with no padding
//! and no self-describing framing. Strings travel as length-prefixed
//! UTF-16LE with a sentinel for null.
//!
//! ```
//! use tapewire::{CodecRegistry, Record, ScalarKind, TypeDescriptorBuilder};
//!
//! let registry = CodecRegistry::new();
//! let desc = registry
//!     .register(
//!         TypeDescriptorBuilder::new("Tick")
//!             .scalar_field("qty", ScalarKind::I32, 1)
//!             .string_field("note", 2)
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let mut tick = Record::blank(&desc);
//! tick.set("qty", 42i32).unwrap();
//! tick.set("note", "hi").unwrap();
//!
//! let bytes = registry.encode(&tick).unwrap();
//! let back = registry.decode_bytes("Tick", &bytes).unwrap();
//! assert_eq!(back.get::<i32>("qty").unwrap(), 42);
//! ```

pub mod cast;
pub mod clone;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod record;
pub mod ser;
pub mod symbol;
pub mod value;

pub use cast::{CastEntry, CastTable};
pub use clone::Cloner;
pub use codec::{CodecRegistry, CompiledCodec};
pub use config::CodecConfig;
pub use descriptor::{
    EnumDescriptor, EnumVariant, FieldDescriptor, FieldKind, ScalarKind, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use error::{CodecError, CodecResult};
pub use record::{Record, SharedRecord};
pub use ser::{ReadCursor, WireError, WireResult, WireWriter};
pub use symbol::{Symbol, SymbolRegistry};
pub use value::{Duration, Timestamp, Value};
