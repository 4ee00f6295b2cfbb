//! Writer for au streams.
//!
//! Keys are interned on first use: before each record, the encoder emits one
//! dictionary unit binding every key the record introduces, so the stream it
//! produces never contains a forward reference.

use std::collections::HashMap;
use std::io::{self, Write};

use au_core::{DictCode, Dictionary, DictionaryError, Value};
use indexmap::IndexMap;

use crate::wire::{UnitKind, encode_varint, header_payload, marker, write_unit, zigzag_encode};

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("write error: {0}")]
    Io(#[from] io::Error),
    #[error("dictionary code space exhausted")]
    TooManyKeys,
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Streams records into `out`, opening with a header unit.
pub struct Encoder<W: Write> {
    out: W,
    /// Code each key is written with.
    codes: IndexMap<String, DictCode>,
    /// Every binding already written to the stream.
    bound: Dictionary,
    next_code: u64,
    unit: Vec<u8>,
    payload: Vec<u8>,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder and write the stream header.
    pub fn new(out: W) -> Result<Self, EncodeError> {
        let mut encoder = Self {
            out,
            codes: IndexMap::new(),
            bound: Dictionary::new(),
            next_code: 1,
            unit: Vec::new(),
            payload: Vec::new(),
        };
        encoder.emit(UnitKind::Header, &header_payload())?;
        Ok(encoder)
    }

    /// Keys interned so far, in definition order.
    pub fn codes(&self) -> impl Iterator<Item = (&str, DictCode)> {
        self.codes.iter().map(|(name, code)| (name.as_str(), *code))
    }

    /// Write a dictionary unit with explicit codes.
    ///
    /// Later records reuse these bindings. Rebinding a name moves it to the new
    /// code. Rebinding a code to another name fails before anything is written,
    /// since a decoder would reject the unit.
    pub fn define(&mut self, entries: &[(DictCode, &str)]) -> Result<(), EncodeError> {
        let mut pending: HashMap<DictCode, &str> = HashMap::with_capacity(entries.len());
        for &(code, name) in entries {
            let existing = self
                .bound
                .resolve(code)
                .ok()
                .or_else(|| pending.get(&code).copied());
            if let Some(existing) = existing.filter(|existing| *existing != name) {
                return Err(DictionaryError::DuplicateCode {
                    code,
                    existing: existing.to_owned(),
                    attempted: name.to_owned(),
                }
                .into());
            }
            pending.insert(code, name);
        }

        for &(code, name) in entries {
            self.bound.define(code, name)?;
            self.codes.insert(name.to_owned(), code);
            self.next_code = self.next_code.max(code.as_u32() as u64 + 1);
        }
        let payload = definitions_payload(entries.iter().map(|(code, name)| (*code, *name)));
        self.emit(UnitKind::Dictionary, &payload)
    }

    /// Write one record, preceded by a dictionary unit for any new keys.
    pub fn write_record(&mut self, value: &Value) -> Result<(), EncodeError> {
        let first_new = self.codes.len();
        self.intern_keys(value)?;

        if self.codes.len() > first_new {
            let fresh: Vec<(DictCode, &str)> = self
                .codes
                .iter()
                .skip(first_new)
                .map(|(name, code)| (*code, name.as_str()))
                .collect();
            for &(code, name) in &fresh {
                self.bound.define(code, name)?;
            }
            let payload = definitions_payload(fresh.into_iter());
            self.emit(UnitKind::Dictionary, &payload)?;
        }

        let mut payload = std::mem::take(&mut self.payload);
        payload.clear();
        self.encode_value(value, &mut payload);
        let result = self.emit(UnitKind::Record, &payload);
        self.payload = payload;
        result
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W, EncodeError> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn intern_keys(&mut self, value: &Value) -> Result<(), EncodeError> {
        let mut stack = vec![value];
        while let Some(value) = stack.pop() {
            match value {
                Value::Array(items) => stack.extend(items.iter().rev()),
                Value::Object(fields) => {
                    for (key, _) in fields {
                        if !self.codes.contains_key(key) {
                            let raw = u32::try_from(self.next_code)
                                .map_err(|_| EncodeError::TooManyKeys)?;
                            self.codes.insert(key.clone(), DictCode::new(raw));
                            self.next_code += 1;
                        }
                    }
                    stack.extend(fields.iter().rev().map(|(_, v)| v));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn encode_value(&self, value: &Value, out: &mut Vec<u8>) {
        match value {
            Value::Null => out.push(marker::NULL),
            Value::Bool(true) => out.push(marker::TRUE),
            Value::Bool(false) => out.push(marker::FALSE),
            Value::Int64(i) => {
                out.push(marker::SIGNED);
                encode_varint(zigzag_encode(*i), out);
            }
            Value::Uint64(u) => {
                out.push(marker::UNSIGNED);
                encode_varint(*u, out);
            }
            Value::Double(d) => {
                out.push(marker::DOUBLE);
                out.extend_from_slice(&d.to_le_bytes());
            }
            Value::String(s) => {
                out.push(marker::STRING);
                encode_varint(s.len() as u64, out);
                out.extend_from_slice(s.as_bytes());
            }
            Value::Array(items) => {
                out.push(marker::ARRAY);
                encode_varint(items.len() as u64, out);
                for item in items {
                    self.encode_value(item, out);
                }
            }
            Value::Object(fields) => {
                out.push(marker::OBJECT);
                encode_varint(fields.len() as u64, out);
                for (key, value) in fields {
                    // Every key was interned before encoding started.
                    let code = self.codes.get(key).map_or(0, |c| c.as_u32());
                    encode_varint(code as u64, out);
                    self.encode_value(value, out);
                }
            }
        }
    }

    fn emit(&mut self, kind: UnitKind, payload: &[u8]) -> Result<(), EncodeError> {
        self.unit.clear();
        write_unit(&mut self.unit, kind, payload);
        self.out.write_all(&self.unit)?;
        Ok(())
    }
}

/// Payload of a dictionary unit binding `entries` in order.
pub fn definitions_payload<'a>(entries: impl ExactSizeIterator<Item = (DictCode, &'a str)>) -> Vec<u8> {
    let mut payload = Vec::new();
    encode_varint(entries.len() as u64, &mut payload);
    for (code, name) in entries {
        encode_varint(code.as_u32() as u64, &mut payload);
        encode_varint(name.len() as u64, &mut payload);
        payload.extend_from_slice(name.as_bytes());
    }
    payload
}
