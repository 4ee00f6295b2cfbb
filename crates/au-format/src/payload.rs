//! Parsers for unit payloads.
//!
//! The decoder frames a unit first and hands the exact payload slice here, so
//! none of these functions can read past their unit.

use au_core::{DictCode, Dictionary, Value};

use crate::error::MalformedKind;
use crate::wire::{MAGIC, VERSION, VarintError, decode_varint, marker, zigzag_decode};

/// Why a record payload could not become a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordError {
    Malformed(MalformedKind),
    UnknownCode(DictCode),
}

impl From<MalformedKind> for RecordError {
    fn from(kind: MalformedKind) -> Self {
        RecordError::Malformed(kind)
    }
}

/// Cursor over one payload.
struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn finish(&self) -> Result<(), MalformedKind> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(MalformedKind::TrailingBytes(n)),
        }
    }

    fn byte(&mut self) -> Result<u8, MalformedKind> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(MalformedKind::TruncatedValue)?;
        self.pos += 1;
        Ok(b)
    }

    fn varint(&mut self) -> Result<u64, MalformedKind> {
        let (value, len) = decode_varint(&self.bytes[self.pos..]).map_err(|e| match e {
            VarintError::Truncated => MalformedKind::TruncatedValue,
            VarintError::Overlong => MalformedKind::OverlongVarint,
        })?;
        self.pos += len;
        Ok(value)
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8], MalformedKind> {
        if len > self.remaining() as u64 {
            return Err(MalformedKind::TruncatedValue);
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.bytes[start..self.pos])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], MalformedKind> {
        let slice = self.take(N as u64)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn string(&mut self) -> Result<String, MalformedKind> {
        let len = self.varint()?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| MalformedKind::InvalidUtf8)
    }

    fn code(&mut self) -> Result<DictCode, MalformedKind> {
        let raw = self.varint()?;
        u32::try_from(raw)
            .map(DictCode::new)
            .map_err(|_| MalformedKind::CodeOutOfRange(raw))
    }

    /// Read a count and reject it if `count * min_size` cannot fit in what is left.
    fn count(&mut self, min_size: usize) -> Result<usize, MalformedKind> {
        let count = self.varint()?;
        if count > (self.remaining() / min_size) as u64 {
            return Err(MalformedKind::CountOverrun(count));
        }
        Ok(count as usize)
    }
}

/// Parse a header payload, returning its version.
pub(crate) fn read_header(payload: &[u8]) -> Result<u64, MalformedKind> {
    let mut reader = PayloadReader::new(payload);
    let magic = reader.take(MAGIC.len() as u64).map_err(|_| MalformedKind::BadMagic)?;
    if magic != MAGIC.as_slice() {
        return Err(MalformedKind::BadMagic);
    }
    let version = reader.varint()?;
    if version != VERSION {
        return Err(MalformedKind::UnsupportedVersion(version));
    }
    reader.finish()?;
    Ok(version)
}

/// Parse a dictionary payload into its `(code, name)` pairs, in stream order.
pub(crate) fn read_definitions(payload: &[u8]) -> Result<Vec<(DictCode, String)>, MalformedKind> {
    let mut reader = PayloadReader::new(payload);
    // Smallest entry: one-byte code plus a zero length.
    let count = reader.count(2)?;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let code = reader.code()?;
        let name = reader.string()?;
        entries.push((code, name));
    }
    reader.finish()?;
    Ok(entries)
}

/// Parse a record payload, resolving every object key through `dict`.
pub(crate) fn read_record(
    payload: &[u8],
    dict: &Dictionary,
    max_depth: usize,
) -> Result<Value, RecordError> {
    let mut parser = RecordParser {
        reader: PayloadReader::new(payload),
        dict,
        max_depth,
    };
    let value = parser.value(0)?;
    parser.reader.finish()?;
    Ok(value)
}

struct RecordParser<'a, 'd> {
    reader: PayloadReader<'a>,
    dict: &'d Dictionary,
    max_depth: usize,
}

impl RecordParser<'_, '_> {
    fn value(&mut self, depth: usize) -> Result<Value, RecordError> {
        let tag = self.reader.byte()?;
        let value = match tag {
            marker::NULL => Value::Null,
            marker::TRUE => Value::Bool(true),
            marker::FALSE => Value::Bool(false),
            marker::SIGNED => Value::Int64(zigzag_decode(self.reader.varint()?)),
            marker::UNSIGNED => Value::Uint64(self.reader.varint()?),
            marker::DOUBLE => Value::Double(f64::from_le_bytes(self.reader.array()?)),
            marker::FLOAT => Value::Double(f32::from_le_bytes(self.reader.array()?) as f64),
            marker::STRING => Value::String(self.reader.string()?),
            marker::ARRAY => {
                self.check_depth(depth)?;
                let count = self.reader.count(1)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.value(depth + 1)?);
                }
                Value::Array(items)
            }
            marker::OBJECT => {
                self.check_depth(depth)?;
                let count = self.reader.count(2)?;
                let mut fields = Vec::with_capacity(count);
                for _ in 0..count {
                    let code = self.reader.code()?;
                    let key = self
                        .dict
                        .resolve(code)
                        .map_err(|_| RecordError::UnknownCode(code))?
                        .to_owned();
                    fields.push((key, self.value(depth + 1)?));
                }
                Value::Object(fields)
            }
            other => return Err(MalformedKind::InvalidValueTag(other).into()),
        };
        Ok(value)
    }

    fn check_depth(&self, depth: usize) -> Result<(), MalformedKind> {
        if depth >= self.max_depth {
            return Err(MalformedKind::TooDeep(self.max_depth));
        }
        Ok(())
    }
}
