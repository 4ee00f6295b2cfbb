//! Unsigned LEB128 varints and zigzag mapping for signed integers.

/// A `u64` never needs more than ten 7-bit groups.
pub const MAX_VARINT_BYTES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Input ended while the continuation bit was still set.
    Truncated,
    /// More than [`MAX_VARINT_BYTES`] groups, or bits beyond 64.
    Overlong,
}

pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Decode a varint from the front of `bytes`, returning (value, bytes consumed).
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut result: u64 = 0;

    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_BYTES) {
        let group = (byte & 0x7F) as u64;
        // The tenth group may only carry the single remaining bit.
        if i == MAX_VARINT_BYTES - 1 && group > 1 {
            return Err(VarintError::Overlong);
        }
        result |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(VarintError::Overlong)
    } else {
        Err(VarintError::Truncated)
    }
}

#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
