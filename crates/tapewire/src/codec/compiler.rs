// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type compiled codec.
//!
//! [`CompiledCodec::compile`] walks a type descriptor once, in declaration
//! order, and resolves every tagged field to its op triple. After that,
//! encode/decode/length are straight loops over the op table with no
//! per-call reflection over the descriptor.

use crate::cast::CastTable;
use crate::codec::field::{compile_field, FieldOp};
use crate::codec::CodecRegistry;
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::ser::{ReadCursor, WireWriter};
use std::sync::Arc;

/// Compiled dispatch table for one registered type.
pub struct CompiledCodec {
    descriptor: Arc<TypeDescriptor>,
    ops: Vec<FieldOp>,
}

impl CompiledCodec {
    pub(crate) fn compile(
        descriptor: &Arc<TypeDescriptor>,
        casts: &CastTable,
    ) -> CodecResult<Self> {
        descriptor.validate()?;
        let type_name = descriptor.name_arc();
        let mut ops = Vec::new();
        for (slot, field) in descriptor.tagged_fields() {
            // tagged_fields only yields fields carrying a member id.
            let Some(member_id) = field.member_id else {
                continue;
            };
            ops.push(compile_field(&type_name, field, slot, member_id, casts)?);
        }
        Ok(Self {
            descriptor: Arc::clone(descriptor),
            ops,
        })
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Number of serialized fields.
    pub fn field_count(&self) -> usize {
        self.ops.len()
    }

    fn check_record(&self, record: &Record) -> CodecResult<()> {
        if record.type_name() != self.descriptor.name() {
            return Err(CodecError::Schema {
                type_name: record.type_name().to_string(),
                reason: format!(
                    "record does not match codec for type '{}'",
                    self.descriptor.name()
                ),
            });
        }
        Ok(())
    }

    /// Append the record's wire image to `w`, returning bytes written.
    pub fn encode_into(
        &self,
        record: &Record,
        w: &mut WireWriter,
        registry: &CodecRegistry,
    ) -> CodecResult<usize> {
        self.check_record(record)?;
        let start = w.offset();
        for op in &self.ops {
            (op.encode)(record.slot(op.slot), w, registry)?;
        }
        Ok(w.offset() - start)
    }

    /// Exact wire size of the record without serializing it.
    pub fn encoded_len(&self, record: &Record, registry: &CodecRegistry) -> CodecResult<usize> {
        self.check_record(record)?;
        let mut total = 0;
        for op in &self.ops {
            total += (op.length)(record.slot(op.slot), registry)?;
        }
        Ok(total)
    }

    /// Rebuild a record from the cursor, consuming exactly its wire image.
    pub fn decode(
        &self,
        cur: &mut ReadCursor<'_>,
        registry: &CodecRegistry,
    ) -> CodecResult<Record> {
        let mut record = Record::blank(&self.descriptor);
        for op in &self.ops {
            let value = (op.decode)(cur, registry)?;
            record.set_slot(op.slot, value);
        }
        Ok(record)
    }
}

impl std::fmt::Debug for CompiledCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledCodec")
            .field("type", &self.descriptor.name())
            .field("ops", &self.ops)
            .finish()
    }
}
