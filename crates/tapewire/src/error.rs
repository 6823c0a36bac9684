// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for descriptor registration, codec compilation, and
//! encode/decode execution.
//!
//! Schema, missing-codec, field-size, and cast errors surface on the first
//! use of a type and recur deterministically on every later attempt; symbol
//! resolution is data-dependent and can fail per decode call. A mid-record
//! failure leaves buffer and record state undefined; callers must discard.

use crate::ser::WireError;
use std::fmt;

/// Errors raised by the codec subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Type is unregistered, has no tagged fields, or its tags collide.
    Schema { type_name: String, reason: String },
    /// Field kind has no entry in the field codec catalog.
    MissingCodec { type_name: String, field: String },
    /// Declared storage width is not 1, 2, 4, or 8 bytes.
    UnsupportedFieldSize {
        type_name: String,
        field: String,
        size: u8,
    },
    /// No conversion registered between the wrapped type and the wire integer.
    UnsupportedCast {
        type_name: String,
        field: String,
        wrapped: String,
    },
    /// Decoded symbol string is unknown to the symbol registry.
    SymbolResolution { symbol: String },
    /// Record field is missing from the type declaration.
    FieldNotFound { type_name: String, field: String },
    /// Decode stream is out of step with the compiled field order.
    MemberIdMismatch {
        expected: u8,
        found: u8,
        offset: usize,
    },
    /// Value stored in a record slot disagrees with the declared field kind.
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },
    /// Malformed payload (odd UTF-16 length, oversized list, ...).
    InvalidData { reason: String },
    /// Buffer over/underflow from the cursor layer.
    Wire(WireError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema { type_name, reason } => {
                write!(f, "schema error for type '{}': {}", type_name, reason)
            }
            Self::MissingCodec { type_name, field } => {
                write!(f, "no field codec for '{}.{}'", type_name, field)
            }
            Self::UnsupportedFieldSize {
                type_name,
                field,
                size,
            } => write!(
                f,
                "unsupported storage width {} for '{}.{}' (must be 1/2/4/8)",
                size, type_name, field
            ),
            Self::UnsupportedCast {
                type_name,
                field,
                wrapped,
            } => write!(
                f,
                "no wire conversion registered for '{}.{}' (wrapped type '{}')",
                type_name, field, wrapped
            ),
            Self::SymbolResolution { symbol } => {
                write!(f, "cannot resolve symbol '{}'", symbol)
            }
            Self::FieldNotFound { type_name, field } => {
                write!(f, "field '{}' not declared on type '{}'", field, type_name)
            }
            Self::MemberIdMismatch {
                expected,
                found,
                offset,
            } => write!(
                f,
                "member id mismatch at offset {}: expected {}, found {}",
                offset, expected, found
            ),
            Self::TypeMismatch {
                field,
                expected,
                got,
            } => write!(
                f,
                "type mismatch on field '{}': expected {}, got {}",
                field, expected, got
            ),
            Self::InvalidData { reason } => write!(f, "invalid data: {}", reason),
            Self::Wire(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WireError> for CodecError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

pub type CodecResult<T> = core::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_items() {
        let err = CodecError::MissingCodec {
            type_name: "Order".into(),
            field: "legs".into(),
        };
        assert_eq!(format!("{}", err), "no field codec for 'Order.legs'");

        let err = CodecError::UnsupportedFieldSize {
            type_name: "Tick".into(),
            field: "side".into(),
            size: 3,
        };
        assert_eq!(
            format!("{}", err),
            "unsupported storage width 3 for 'Tick.side' (must be 1/2/4/8)"
        );

        let err = CodecError::MemberIdMismatch {
            expected: 2,
            found: 7,
            offset: 5,
        };
        assert_eq!(
            format!("{}", err),
            "member id mismatch at offset 5: expected 2, found 7"
        );
    }

    #[test]
    fn test_wire_error_wraps_with_source() {
        let err: CodecError = WireError::ReadFailed {
            offset: 3,
            reason: "unexpected end of buffer".into(),
        }
        .into();
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(format!("{}", err), "read failed at offset 3: unexpected end of buffer");
    }
}
