// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec registry: owns the descriptor table, the compiled codec cache, the
//! symbol registry, and the cast table.
//!
//! A registry is the serialization context. Every public entry point takes
//! `&self`, and both caches use double-checked read/write locking so that
//! steady-state traffic only ever takes read locks. Compilation happens at
//! most once per registered type, on first use.

mod compiler;
mod field;

pub use compiler::CompiledCodec;

use crate::cast::{CastEntry, CastTable};
use crate::config::CodecConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::ser::{ReadCursor, WireWriter};
use crate::symbol::SymbolRegistry;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct CodecRegistry {
    types: RwLock<HashMap<Arc<str>, Arc<TypeDescriptor>>>,
    codecs: RwLock<HashMap<Arc<str>, Arc<CompiledCodec>>>,
    symbols: Arc<SymbolRegistry>,
    casts: CastTable,
    config: CodecConfig,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
            codecs: RwLock::new(HashMap::new()),
            symbols: Arc::new(SymbolRegistry::new()),
            casts: CastTable::with_defaults(),
            config,
        }
    }

    pub fn symbols(&self) -> &Arc<SymbolRegistry> {
        &self.symbols
    }

    pub(crate) fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Install a conversion for a wrapped field type. Must run before the
    /// registry is shared, which is why it takes `&mut self`.
    pub fn register_cast(&mut self, name: impl Into<String>, entry: CastEntry) {
        self.casts.register(name, entry);
    }

    /// Register a type declaration under its name.
    ///
    /// Re-registering the same declaration is idempotent and returns the
    /// existing descriptor. A different declaration under a taken name is a
    /// schema error, since compiled codecs for it may already be in use.
    pub fn register(&self, descriptor: TypeDescriptor) -> CodecResult<Arc<TypeDescriptor>> {
        descriptor.validate()?;
        let mut types = self.types.write();
        if let Some(existing) = types.get(descriptor.name()) {
            if **existing == descriptor {
                return Ok(Arc::clone(existing));
            }
            return Err(CodecError::Schema {
                type_name: descriptor.name().to_string(),
                reason: "already registered with a different declaration".to_string(),
            });
        }
        let descriptor = Arc::new(descriptor);
        types.insert(descriptor.name_arc(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Look up a registered descriptor.
    pub fn descriptor(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(type_name).cloned()
    }

    /// Fetch the compiled codec for a type, compiling on first use.
    pub fn get_or_compile(&self, type_name: &str) -> CodecResult<Arc<CompiledCodec>> {
        if let Some(hit) = self.codecs.read().get(type_name) {
            return Ok(Arc::clone(hit));
        }
        let mut codecs = self.codecs.write();
        // Re-check under the write lock; another thread may have won.
        if let Some(hit) = codecs.get(type_name) {
            return Ok(Arc::clone(hit));
        }
        let descriptor =
            self.descriptor(type_name)
                .ok_or_else(|| CodecError::Schema {
                    type_name: type_name.to_string(),
                    reason: "type not registered".to_string(),
                })?;
        log::debug!("compiling codec for type '{}'", type_name);
        let codec = Arc::new(CompiledCodec::compile(&descriptor, &self.casts)?);
        codecs.insert(descriptor.name_arc(), Arc::clone(&codec));
        Ok(codec)
    }

    /// Exact wire size of a record.
    pub fn encoded_len(&self, record: &Record) -> CodecResult<usize> {
        self.get_or_compile(record.type_name())?
            .encoded_len(record, self)
    }

    /// Serialize a record to a fresh buffer.
    pub fn encode(&self, record: &Record) -> CodecResult<Vec<u8>> {
        let mut w = WireWriter::new();
        self.encode_into(record, &mut w)?;
        Ok(w.into_bytes())
    }

    /// Serialize a record, appending to `w`. The destination is pre-sized
    /// from the computed length, so the write phase never reallocates.
    pub fn encode_into(&self, record: &Record, w: &mut WireWriter) -> CodecResult<usize> {
        let codec = self.get_or_compile(record.type_name())?;
        let need = codec.encoded_len(record, self)?;
        w.reserve(need);
        let written = codec.encode_into(record, w, self)?;
        // A shared element mutated between the two passes shows up here;
        // the buffer contents are undefined and the caller must discard.
        if written != need {
            return Err(CodecError::InvalidData {
                reason: format!(
                    "record changed during encode: wrote {} bytes, length pass computed {}",
                    written, need
                ),
            });
        }
        Ok(written)
    }

    /// Nested encode for list elements: no pre-sizing, the outer call
    /// already reserved the full image.
    pub(crate) fn encode_element(&self, record: &Record, w: &mut WireWriter) -> CodecResult<usize> {
        self.get_or_compile(record.type_name())?
            .encode_into(record, w, self)
    }

    /// Deserialize one record of `type_name` from the cursor.
    pub fn decode(&self, type_name: &str, cur: &mut ReadCursor<'_>) -> CodecResult<Record> {
        self.get_or_compile(type_name)?.decode(cur, self)
    }

    /// Deserialize from a byte slice, requiring the image to be consumed
    /// exactly.
    pub fn decode_bytes(&self, type_name: &str, bytes: &[u8]) -> CodecResult<Record> {
        let mut cur = ReadCursor::new(bytes);
        let record = self.decode(type_name, &mut cur)?;
        if !cur.is_eof() {
            return Err(CodecError::InvalidData {
                reason: format!("{} trailing bytes after record image", cur.remaining()),
            });
        }
        Ok(record)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("types", &self.types.read().len())
            .field("compiled", &self.codecs.read().len())
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ScalarKind, TypeDescriptorBuilder};

    fn point_type() -> TypeDescriptor {
        TypeDescriptorBuilder::new("Point")
            .scalar_field("x", ScalarKind::I32, 1)
            .scalar_field("y", ScalarKind::I32, 2)
            .build()
    }

    #[test]
    fn test_register_is_idempotent_for_same_shape() {
        let reg = CodecRegistry::new();
        let a = reg.register(point_type()).expect("first");
        let b = reg.register(point_type()).expect("second");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_register_rejects_conflicting_shape() {
        let reg = CodecRegistry::new();
        reg.register(point_type()).expect("first");
        let other = TypeDescriptorBuilder::new("Point")
            .scalar_field("x", ScalarKind::I64, 1)
            .build();
        assert!(matches!(
            reg.register(other),
            Err(CodecError::Schema { .. })
        ));
    }

    #[test]
    fn test_get_or_compile_unknown_type() {
        let reg = CodecRegistry::new();
        let err = reg.get_or_compile("Nope").unwrap_err();
        assert!(matches!(err, CodecError::Schema { .. }));
    }

    #[test]
    fn test_get_or_compile_caches_one_instance() {
        let reg = CodecRegistry::new();
        reg.register(point_type()).expect("register");
        let a = reg.get_or_compile("Point").expect("first");
        let b = reg.get_or_compile("Point").expect("second");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_encode_matches_length() {
        let reg = CodecRegistry::new();
        let desc = reg.register(point_type()).expect("register");
        let mut rec = Record::blank(&desc);
        rec.set("x", 7i32).expect("set x");
        rec.set("y", -3i32).expect("set y");
        let bytes = reg.encode(&rec).expect("encode");
        assert_eq!(bytes.len(), reg.encoded_len(&rec).expect("len"));
    }

    #[test]
    fn test_encode_fails_when_record_mutates_between_passes() {
        use crate::cast::CastEntry;
        use crate::record::SharedRecord;
        use crate::value::{Timestamp, Value};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Mutex;

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        static VICTIM: Mutex<Option<SharedRecord>> = Mutex::new(None);

        // Stands in for a writer racing the encode: the length pass sees the
        // short note, then this grows it before the write pass reaches the
        // list field.
        fn to_wire(value: &Value) -> Option<i64> {
            if CALLS.fetch_add(1, Ordering::SeqCst) == 1 {
                if let Some(victim) = VICTIM.lock().unwrap().as_ref() {
                    victim
                        .write()
                        .set("note", "grown well past the measured size")
                        .unwrap();
                }
            }
            match value {
                Value::Time(Timestamp(n)) => Some(*n),
                _ => None,
            }
        }

        let mut reg = CodecRegistry::new();
        reg.register_cast(
            "Tracked",
            CastEntry {
                to_wire,
                from_wire: |n| Value::Time(Timestamp(n)),
            },
        );
        let leg = reg
            .register(
                TypeDescriptorBuilder::new("Leg")
                    .string_field("note", 1)
                    .build(),
            )
            .expect("register leg");
        let desc = reg
            .register(
                TypeDescriptorBuilder::new("Gadget")
                    .wrapped_field("at", "Tracked", 1)
                    .list_field("items", 2)
                    .build(),
            )
            .expect("register gadget");

        let mut item = Record::blank(&leg);
        item.set("note", "short").expect("note");
        let item = item.into_shared();
        *VICTIM.lock().unwrap() = Some(Arc::clone(&item));

        let mut rec = Record::blank(&desc);
        rec.set("at", Timestamp(5)).expect("at");
        rec.set_value("items", Value::List(vec![item])).expect("items");

        match reg.encode(&rec) {
            Err(CodecError::InvalidData { reason }) => {
                assert!(reason.contains("changed during encode"), "{}", reason);
            }
            other => panic!("expected length disagreement, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_bytes_rejects_trailing_garbage() {
        let reg = CodecRegistry::new();
        let desc = reg.register(point_type()).expect("register");
        let rec = Record::blank(&desc);
        let mut bytes = reg.encode(&rec).expect("encode");
        bytes.push(0xAA);
        assert!(matches!(
            reg.decode_bytes("Point", &bytes),
            Err(CodecError::InvalidData { .. })
        ));
    }
}
