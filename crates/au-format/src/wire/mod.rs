//! Wire format definitions.
//!
//! A stream is a flat sequence of self-delimited units:
//!
//! ```text
//! unit := tag:u8 len:varint payload:[u8; len] b'\n'
//! ```
//!
//! The trailing newline is not part of the payload. It lets a reader that hit
//! corruption scan forward for a plausible next unit without understanding
//! the bytes in between.

mod varint;

#[cfg(test)]
mod varint_tests;

pub use varint::{
    MAX_VARINT_BYTES, VarintError, decode_varint, encode_varint, zigzag_decode, zigzag_encode,
};

/// Magic bytes opening every header payload.
pub const MAGIC: [u8; 2] = *b"au";

/// Current format version.
pub const VERSION: u64 = 1;

/// Byte closing every unit.
pub const UNIT_TERMINATOR: u8 = b'\n';

/// Unit kinds, identified by their leading tag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Magic + version. May repeat when streams are concatenated.
    Header,
    /// Batch of `(code, name)` dictionary definitions.
    Dictionary,
    /// Exactly one value.
    Record,
}

impl UnitKind {
    pub const fn tag(self) -> u8 {
        match self {
            UnitKind::Header => b'H',
            UnitKind::Dictionary => b'A',
            UnitKind::Record => b'R',
        }
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'H' => Some(UnitKind::Header),
            b'A' => Some(UnitKind::Dictionary),
            b'R' => Some(UnitKind::Record),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Header => "header",
            UnitKind::Dictionary => "dict",
            UnitKind::Record => "record",
        }
    }
}

/// Value tags inside record payloads.
pub mod marker {
    pub const NULL: u8 = b'N';
    pub const TRUE: u8 = b'T';
    pub const FALSE: u8 = b'F';
    /// Zigzag varint, decoded as `Int64`.
    pub const SIGNED: u8 = b'I';
    /// Plain varint, decoded as `Uint64`.
    pub const UNSIGNED: u8 = b'U';
    /// 8-byte little-endian IEEE double.
    pub const DOUBLE: u8 = b'D';
    /// 4-byte little-endian IEEE float, widened to `Double`.
    pub const FLOAT: u8 = b'f';
    /// Length-prefixed UTF-8.
    pub const STRING: u8 = b'S';
    /// Count-prefixed values.
    pub const ARRAY: u8 = b'[';
    /// Count-prefixed `(code, value)` pairs.
    pub const OBJECT: u8 = b'{';
}

/// Append a complete unit (tag, length, payload, terminator) to `out`.
pub fn write_unit(out: &mut Vec<u8>, kind: UnitKind, payload: &[u8]) {
    out.push(kind.tag());
    encode_varint(payload.len() as u64, out);
    out.extend_from_slice(payload);
    out.push(UNIT_TERMINATOR);
}

/// Header unit payload for the current version.
pub fn header_payload() -> Vec<u8> {
    let mut payload = MAGIC.to_vec();
    encode_varint(VERSION, &mut payload);
    payload
}
