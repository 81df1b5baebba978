//! Same-length replacement payloads for scrubbed instruction names.
//!
//! A payload is derived from the original name's byte length alone, never
//! from its content: whole repeats of a fixed multi-byte filler code point,
//! then single-byte padding for whatever remainder the filler cannot fill.

use serde::{Deserialize, Serialize};

/// Filler and pad used to build replacement payloads.
///
/// Both are configuration constants rather than hard requirements; the
/// defaults use a four-byte code point plus `_` padding, so any remainder
/// of 1..=3 bytes is covered by the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSpec {
    /// Multi-byte filler unit, repeated as many whole times as fit.
    pub filler: char,
    /// Single-byte pad for the remaining deficit.
    pub pad: u8,
}

impl Default for PayloadSpec {
    fn default() -> Self {
        Self { filler: '\u{1F512}', pad: b'_' }
    }
}

impl PayloadSpec {
    /// Build a payload of exactly `target_len` bytes.
    ///
    /// Invariant: the returned vector's length equals `target_len` for every
    /// `target_len >= 0`. The deficit padded with single bytes is always
    /// strictly smaller than the filler's encoded length.
    pub fn build(&self, target_len: usize) -> Vec<u8> {
        let mut unit_buf = [0u8; 4];
        let unit = self.filler.encode_utf8(&mut unit_buf).as_bytes();

        let mut out = Vec::with_capacity(target_len);
        while out.len() + unit.len() <= target_len {
            out.extend_from_slice(unit);
        }
        while out.len() < target_len {
            out.push(self.pad);
        }
        out
    }
}
