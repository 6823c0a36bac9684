// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec limits.
//!
//! Decode-side guards against hostile length prefixes. Defaults are
//! permissive; feed handlers with known message shapes should tighten them.

/// Default cap on a decoded string payload, in bytes.
pub const DEFAULT_MAX_STRING_BYTES: usize = 1 << 20;

/// Default cap on list element counts (the wire count field is 2 bytes).
pub const DEFAULT_MAX_LIST_ELEMENTS: usize = u16::MAX as usize;

/// Runtime limits owned by the codec registry.
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    /// Reject decoded string payloads longer than this many bytes.
    pub max_string_bytes: usize,
    /// Reject lists with more elements than this on encode and decode.
    pub max_list_elements: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
            max_list_elements: DEFAULT_MAX_LIST_ELEMENTS,
        }
    }
}
