// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interned domain symbols (tradable instrument references).
//!
//! Symbols are stored by reference, not by value: the wire carries the
//! canonical string, and decoders resolve it through the process-wide
//! registry. Resolution failure fails the decode.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// An interned identifier resolved through a [`SymbolRegistry`].
#[derive(Debug, Clone, Eq)]
pub struct Symbol {
    name: Arc<str>,
}

impl Symbol {
    /// Canonical string form, as written on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        // Interned: pointer equality is the common case, fall back to bytes.
        Arc::ptr_eq(&self.name, &other.name) || self.name == other.name
    }
}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lock-free registry of known symbols, keyed by canonical string.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    map: DashMap<Arc<str>, Symbol>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Register a symbol (idempotent) and return its interned handle.
    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(existing) = self.map.get(name) {
            return existing.clone();
        }
        let key: Arc<str> = name.into();
        let symbol = Symbol {
            name: Arc::clone(&key),
        };
        self.map.entry(key).or_insert_with(|| symbol.clone());
        // Re-read so concurrent interners agree on one handle.
        self.map.get(name).map(|s| s.clone()).unwrap_or(symbol)
    }

    /// Resolve a canonical string to a previously interned symbol.
    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).map(|s| s.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
