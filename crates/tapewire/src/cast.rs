// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion table for wrapped/cast fields.
//!
//! A wrapped field stores a domain type (timestamp, duration) as a plain
//! 8-byte wire integer. The conversion pair is looked up by the wrapped
//! type's declared name when the codec is compiled; a missing entry fails
//! compilation with `UnsupportedCast`.

use crate::value::{Duration, Timestamp, Value};
use std::collections::HashMap;

/// One registered conversion pair.
#[derive(Clone, Copy)]
pub struct CastEntry {
    /// Extract the wire integer; `None` when the value has the wrong shape.
    pub to_wire: fn(&Value) -> Option<i64>,
    /// Rebuild the domain value from the wire integer.
    pub from_wire: fn(i64) -> Value,
}

/// Named conversion pairs, fixed after construction.
pub struct CastTable {
    entries: HashMap<String, CastEntry>,
}

impl CastTable {
    /// Table with the built-in conversions: `Timestamp` and `Duration`.
    pub fn with_defaults() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };
        table.register("Timestamp", CastEntry {
            to_wire: |v| match v {
                Value::Time(Timestamp(n)) => Some(*n),
                _ => None,
            },
            from_wire: |n| Value::Time(Timestamp(n)),
        });
        table.register("Duration", CastEntry {
            to_wire: |v| match v {
                Value::Span(Duration(n)) => Some(*n),
                _ => None,
            },
            from_wire: |n| Value::Span(Duration(n)),
        });
        table
    }

    /// Register a conversion pair under a wrapped type name.
    pub fn register(&mut self, name: impl Into<String>, entry: CastEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn lookup(&self, name: &str) -> Option<&CastEntry> {
        self.entries.get(name)
    }
}

impl Default for CastTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_conversions_roundtrip() {
        let table = CastTable::with_defaults();

        let ts = table.lookup("Timestamp").expect("timestamp cast");
        let wire = (ts.to_wire)(&Value::Time(Timestamp(1_702_900_000_000_000_000)))
            .expect("timestamp to wire");
        assert_eq!((ts.from_wire)(wire), Value::Time(Timestamp(wire)));

        let dur = table.lookup("Duration").expect("duration cast");
        assert_eq!((dur.to_wire)(&Value::Span(Duration(-250))), Some(-250));
        assert_eq!((dur.from_wire)(-250), Value::Span(Duration(-250)));
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let table = CastTable::with_defaults();
        let ts = table.lookup("Timestamp").expect("timestamp cast");
        assert_eq!((ts.to_wire)(&Value::I64(7)), None);
    }

    #[test]
    fn test_unknown_name_misses() {
        let table = CastTable::with_defaults();
        assert!(table.lookup("Price").is_none());
    }
}
