// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked cursor/buffer primitives for the wire codec.

pub mod cursor;

pub use cursor::{ReadCursor, WireWriter};

use std::fmt;

/// Low-level buffer error used within `ser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    WriteFailed { offset: usize, reason: String },
    ReadFailed { offset: usize, reason: String },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            WireError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
        }
    }
}

impl std::error::Error for WireError {}

pub type WireResult<T> = core::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_error_display_variants() {
        let err = WireError::ReadFailed {
            offset: 4,
            reason: "unexpected end of buffer".into(),
        };
        assert_eq!(
            format!("{}", err),
            "read failed at offset 4: unexpected end of buffer"
        );

        let err = WireError::WriteFailed {
            offset: 12,
            reason: "length overflow".into(),
        };
        assert_eq!(format!("{}", err), "write failed at offset 12: length overflow");
    }
}
