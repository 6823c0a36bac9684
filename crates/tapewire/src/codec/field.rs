// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field codec library.
//!
//! Each declared field kind compiles to a [`FieldOp`]: three closures
//! (encode, decode, length) selected once when the owning type's codec is
//! built, then executed in processing order on every call. Encode writes the
//! member id byte followed by the payload and returns bytes written; decode
//! consumes exactly the same bytes; length computes encode's byte count
//! without writing. Length and encode must always agree, since callers
//! pre-size the destination from length.

use crate::cast::CastTable;
use crate::codec::CodecRegistry;
use crate::config::CodecConfig;
use crate::descriptor::{FieldDescriptor, FieldKind, ScalarKind};
use crate::error::{CodecError, CodecResult};
use crate::ser::{ReadCursor, WireWriter};
use crate::value::Value;
use std::sync::Arc;

pub(crate) type EncodeFn =
    Box<dyn Fn(&Value, &mut WireWriter, &CodecRegistry) -> CodecResult<usize> + Send + Sync>;
pub(crate) type DecodeFn =
    Box<dyn Fn(&mut ReadCursor<'_>, &CodecRegistry) -> CodecResult<Value> + Send + Sync>;
pub(crate) type LenFn =
    Box<dyn Fn(&Value, &CodecRegistry) -> CodecResult<usize> + Send + Sync>;

/// Wire length prefix marking a null string/symbol payload.
pub(crate) const NULL_STRING_LEN: u32 = u32::MAX;

/// One compiled field: slot index, member id, and the three operations.
pub(crate) struct FieldOp {
    pub name: Arc<str>,
    pub slot: usize,
    pub member_id: u8,
    pub encode: EncodeFn,
    pub decode: DecodeFn,
    pub length: LenFn,
}

impl std::fmt::Debug for FieldOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOp")
            .field("name", &self.name)
            .field("member_id", &self.member_id)
            .field("slot", &self.slot)
            .finish()
    }
}

fn type_mismatch(field: &Arc<str>, expected: &'static str, got: &Value) -> CodecError {
    CodecError::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    }
}

/// Consume and verify the member id byte ahead of a field payload.
fn expect_member_id(cur: &mut ReadCursor<'_>, expected: u8) -> CodecResult<()> {
    let offset = cur.offset();
    let found = cur.read_u8()?;
    if found != expected {
        return Err(CodecError::MemberIdMismatch {
            expected,
            found,
            offset,
        });
    }
    Ok(())
}

fn utf16_byte_len(s: &str) -> usize {
    s.encode_utf16().count() * 2
}

/// Length-prefix plus payload bytes for the string layout.
pub(crate) fn string_payload_len(s: Option<&str>) -> usize {
    4 + s.map_or(0, utf16_byte_len)
}

/// Write the string layout: 4-byte byte-length prefix, then UTF-16LE code
/// units. Null writes the sentinel prefix and no payload.
pub(crate) fn write_string(w: &mut WireWriter, s: Option<&str>) -> CodecResult<()> {
    match s {
        None => {
            w.write_u32_le(NULL_STRING_LEN);
        }
        Some(s) => {
            let byte_len = utf16_byte_len(s);
            if byte_len as u64 >= u64::from(NULL_STRING_LEN) {
                return Err(CodecError::InvalidData {
                    reason: format!("string payload of {} bytes overflows prefix", byte_len),
                });
            }
            w.write_u32_le(byte_len as u32);
            for unit in s.encode_utf16() {
                w.write_u16_le(unit);
            }
        }
    }
    Ok(())
}

/// Read the string layout back; the sentinel prefix yields `None`.
pub(crate) fn read_string(
    cur: &mut ReadCursor<'_>,
    config: &CodecConfig,
) -> CodecResult<Option<String>> {
    let len = cur.read_u32_le()?;
    if len == NULL_STRING_LEN {
        return Ok(None);
    }
    let len = len as usize;
    if len > config.max_string_bytes {
        return Err(CodecError::InvalidData {
            reason: format!(
                "string payload of {} bytes exceeds limit {}",
                len, config.max_string_bytes
            ),
        });
    }
    if len % 2 != 0 {
        return Err(CodecError::InvalidData {
            reason: format!("odd UTF-16 payload length {}", len),
        });
    }
    let bytes = cur.read_bytes(len)?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16(&units)
        .map(Some)
        .map_err(|_| CodecError::InvalidData {
            reason: "invalid UTF-16 payload".into(),
        })
}

/// Generate the op triple for a fixed-width scalar kind.
macro_rules! scalar_ops {
    ($id:expr, $fname:expr, $width:expr, $variant:ident, $label:expr, $write:ident, $read:ident) => {{
        let enc_field = Arc::clone($fname);
        let encode: EncodeFn = Box::new(move |value, w, _| match value {
            Value::$variant(x) => {
                w.write_u8($id);
                w.$write(*x);
                Ok(1 + $width)
            }
            other => Err(type_mismatch(&enc_field, $label, other)),
        });
        let decode: DecodeFn = Box::new(move |cur, _| {
            expect_member_id(cur, $id)?;
            Ok(Value::$variant(cur.$read()?))
        });
        let len_field = Arc::clone($fname);
        let length: LenFn = Box::new(move |value, _| match value {
            Value::$variant(_) => Ok(1 + $width),
            other => Err(type_mismatch(&len_field, $label, other)),
        });
        (encode, decode, length)
    }};
}

/// Compile one tagged field to its op triple.
///
/// This is the codec catalog: a field kind without an arm here cannot be
/// serialized, and the owning type fails compilation with `MissingCodec`.
pub(crate) fn compile_field(
    type_name: &Arc<str>,
    field: &FieldDescriptor,
    slot: usize,
    member_id: u8,
    casts: &CastTable,
) -> CodecResult<FieldOp> {
    let name = Arc::clone(&field.name);
    let id = member_id;

    let (encode, decode, length): (EncodeFn, DecodeFn, LenFn) = match &field.kind {
        FieldKind::Scalar(kind) => match kind {
            ScalarKind::Bool => {
                let enc_field = Arc::clone(&name);
                let encode: EncodeFn = Box::new(move |value, w, _| match value {
                    Value::Bool(x) => {
                        w.write_u8(id);
                        w.write_u8(u8::from(*x));
                        Ok(2)
                    }
                    other => Err(type_mismatch(&enc_field, "bool", other)),
                });
                let decode: DecodeFn = Box::new(move |cur, _| {
                    expect_member_id(cur, id)?;
                    Ok(Value::Bool(cur.read_u8()? != 0))
                });
                let len_field = Arc::clone(&name);
                let length: LenFn = Box::new(move |value, _| match value {
                    Value::Bool(_) => Ok(2),
                    other => Err(type_mismatch(&len_field, "bool", other)),
                });
                (encode, decode, length)
            }
            ScalarKind::U8 => scalar_ops!(id, &name, 1, U8, "u8", write_u8, read_u8),
            ScalarKind::U16 => scalar_ops!(id, &name, 2, U16, "u16", write_u16_le, read_u16_le),
            ScalarKind::U32 => scalar_ops!(id, &name, 4, U32, "u32", write_u32_le, read_u32_le),
            ScalarKind::U64 => scalar_ops!(id, &name, 8, U64, "u64", write_u64_le, read_u64_le),
            ScalarKind::I8 => scalar_ops!(id, &name, 1, I8, "i8", write_i8, read_i8),
            ScalarKind::I16 => scalar_ops!(id, &name, 2, I16, "i16", write_i16_le, read_i16_le),
            ScalarKind::I32 => scalar_ops!(id, &name, 4, I32, "i32", write_i32_le, read_i32_le),
            ScalarKind::I64 => scalar_ops!(id, &name, 8, I64, "i64", write_i64_le, read_i64_le),
            ScalarKind::F32 => scalar_ops!(id, &name, 4, F32, "f32", write_f32_le, read_f32_le),
            ScalarKind::F64 => scalar_ops!(id, &name, 8, F64, "f64", write_f64_le, read_f64_le),
        },
        FieldKind::Enum(desc) => {
            let width = desc.width as usize;
            if !matches!(width, 1 | 2 | 4 | 8) {
                return Err(CodecError::UnsupportedFieldSize {
                    type_name: type_name.to_string(),
                    field: name.to_string(),
                    size: desc.width,
                });
            }
            let enc_field = Arc::clone(&name);
            let encode: EncodeFn = Box::new(move |value, w, _| match value {
                Value::Enum(raw) => {
                    w.write_u8(id);
                    w.write_bytes(&(*raw as u64).to_le_bytes()[..width]);
                    Ok(1 + width)
                }
                other => Err(type_mismatch(&enc_field, "enum", other)),
            });
            let decode: DecodeFn = Box::new(move |cur, _| {
                expect_member_id(cur, id)?;
                let bytes = cur.read_bytes(width)?;
                let mut buf = [0u8; 8];
                buf[..width].copy_from_slice(bytes);
                // Two's-complement at the declared width: sign-extend so
                // negative variant values survive the round trip.
                let shift = 64 - 8 * width as u32;
                let raw = (u64::from_le_bytes(buf) as i64) << shift >> shift;
                Ok(Value::Enum(raw))
            });
            let len_field = Arc::clone(&name);
            let length: LenFn = Box::new(move |value, _| match value {
                Value::Enum(_) => Ok(1 + width),
                other => Err(type_mismatch(&len_field, "enum", other)),
            });
            (encode, decode, length)
        }
        FieldKind::Str => {
            let enc_field = Arc::clone(&name);
            let encode: EncodeFn = Box::new(move |value, w, _| match value {
                Value::Str(s) => {
                    w.write_u8(id);
                    write_string(w, s.as_deref())?;
                    Ok(1 + string_payload_len(s.as_deref()))
                }
                other => Err(type_mismatch(&enc_field, "string", other)),
            });
            let decode: DecodeFn = Box::new(move |cur, reg| {
                expect_member_id(cur, id)?;
                Ok(Value::Str(read_string(cur, reg.config())?))
            });
            let len_field = Arc::clone(&name);
            let length: LenFn = Box::new(move |value, _| match value {
                Value::Str(s) => Ok(1 + string_payload_len(s.as_deref())),
                other => Err(type_mismatch(&len_field, "string", other)),
            });
            (encode, decode, length)
        }
        FieldKind::Symbol => {
            let enc_field = Arc::clone(&name);
            let encode: EncodeFn = Box::new(move |value, w, _| match value {
                Value::Symbol(s) => {
                    w.write_u8(id);
                    let canonical = s.as_ref().map(|sym| sym.name());
                    write_string(w, canonical)?;
                    Ok(1 + string_payload_len(canonical))
                }
                other => Err(type_mismatch(&enc_field, "symbol", other)),
            });
            let decode: DecodeFn = Box::new(move |cur, reg| {
                expect_member_id(cur, id)?;
                match read_string(cur, reg.config())? {
                    None => Ok(Value::Symbol(None)),
                    Some(canonical) => {
                        let resolved = reg.symbols().resolve(&canonical).ok_or(
                            CodecError::SymbolResolution { symbol: canonical },
                        )?;
                        Ok(Value::Symbol(Some(resolved)))
                    }
                }
            });
            let len_field = Arc::clone(&name);
            let length: LenFn = Box::new(move |value, _| match value {
                Value::Symbol(s) => Ok(1 + string_payload_len(s.as_ref().map(|sym| sym.name()))),
                other => Err(type_mismatch(&len_field, "symbol", other)),
            });
            (encode, decode, length)
        }
        FieldKind::Wrapped { type_name: wrapped } => {
            let entry = *casts
                .lookup(wrapped)
                .ok_or_else(|| CodecError::UnsupportedCast {
                    type_name: type_name.to_string(),
                    field: name.to_string(),
                    wrapped: wrapped.to_string(),
                })?;
            // No member id byte: the payload is a bare 8-byte wire integer.
            let enc_field = Arc::clone(&name);
            let encode: EncodeFn = Box::new(move |value, w, _| {
                let wire = (entry.to_wire)(value)
                    .ok_or_else(|| type_mismatch(&enc_field, "wrapped", value))?;
                w.write_i64_le(wire);
                Ok(8)
            });
            let decode: DecodeFn =
                Box::new(move |cur, _| Ok((entry.from_wire)(cur.read_i64_le()?)));
            let len_field = Arc::clone(&name);
            let length: LenFn = Box::new(move |value, _| {
                (entry.to_wire)(value)
                    .map(|_| 8)
                    .ok_or_else(|| type_mismatch(&len_field, "wrapped", value))
            });
            (encode, decode, length)
        }
        FieldKind::List => {
            let enc_field = Arc::clone(&name);
            let encode: EncodeFn = Box::new(move |value, w, reg| match value {
                Value::List(items) => {
                    let max = reg.config().max_list_elements.min(u16::MAX as usize);
                    if items.len() > max {
                        return Err(CodecError::InvalidData {
                            reason: format!("list of {} elements exceeds limit {}", items.len(), max),
                        });
                    }
                    let start = w.offset();
                    w.write_u8(id);
                    w.write_u16_le(items.len() as u16);
                    for item in items {
                        let element = item.read();
                        // Element type name first, so decoders can dispatch
                        // heterogeneous runtime types through the registry.
                        write_string(w, Some(element.type_name()))?;
                        reg.encode_element(&element, w)?;
                    }
                    Ok(w.offset() - start)
                }
                other => Err(type_mismatch(&enc_field, "list", other)),
            });
            let decode: DecodeFn = Box::new(move |cur, reg| {
                expect_member_id(cur, id)?;
                let count = cur.read_u16_le()? as usize;
                if count > reg.config().max_list_elements {
                    return Err(CodecError::InvalidData {
                        reason: format!(
                            "list of {} elements exceeds limit {}",
                            count,
                            reg.config().max_list_elements
                        ),
                    });
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    let element_type =
                        read_string(cur, reg.config())?.ok_or_else(|| CodecError::InvalidData {
                            reason: "null list element type name".into(),
                        })?;
                    let element = reg.decode(&element_type, cur)?;
                    items.push(element.into_shared());
                }
                Ok(Value::List(items))
            });
            let len_field = Arc::clone(&name);
            let length: LenFn = Box::new(move |value, reg| match value {
                Value::List(items) => {
                    let mut total = 1 + 2;
                    for item in items {
                        let element = item.read();
                        total += string_payload_len(Some(element.type_name()));
                        total += reg.encoded_len(&element)?;
                    }
                    Ok(total)
                }
                other => Err(type_mismatch(&len_field, "list", other)),
            });
            (encode, decode, length)
        }
        FieldKind::Object => {
            return Err(CodecError::MissingCodec {
                type_name: type_name.to_string(),
                field: name.to_string(),
            });
        }
    };

    Ok(FieldOp {
        name,
        slot,
        member_id: id,
        encode,
        decode,
        length,
    })
}
