//! Errors raised while decoding a stream.

use std::io;

use au_core::{DictCode, DictionaryError};

/// What was wrong with a corrupt unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedKind {
    #[error("invalid unit tag 0x{0:02x}")]
    InvalidUnitTag(u8),
    #[error("invalid value tag 0x{0:02x}")]
    InvalidValueTag(u8),
    #[error("unit truncated by end of stream")]
    TruncatedUnit,
    #[error("payload ended inside a value")]
    TruncatedValue,
    #[error("unit length {len} exceeds limit {limit}")]
    UnitTooLarge { len: u64, limit: u64 },
    #[error("unit not closed by a newline terminator")]
    MissingTerminator,
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
    #[error("element count {0} exceeds remaining payload")]
    CountOverrun(u64),
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("varint longer than 10 bytes")]
    OverlongVarint,
    #[error("dictionary code {0} does not fit in 32 bits")]
    CodeOutOfRange(u64),
    #[error("bad header magic")]
    BadMagic,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u64),
}

/// Failure reported by a record handler or sink.
///
/// Always fatal to the decode that delivered the record.
#[derive(Debug, thiserror::Error)]
#[error("{inner}")]
pub struct SinkError {
    #[source]
    inner: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl SinkError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self { inner: err.into() }
    }
}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        Self::new(err)
    }
}

/// Decode failure. Offsets are byte positions of the offending unit.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("record {record} at offset {offset}: unknown dictionary code {code}")]
    UnknownCode {
        code: DictCode,
        offset: u64,
        record: u64,
    },
    #[error(
        "dictionary unit at offset {offset}: code {code} already bound to {existing:?}, cannot rebind to {attempted:?}"
    )]
    DuplicateCode {
        code: DictCode,
        existing: String,
        attempted: String,
        offset: u64,
    },
    #[error("malformed unit at offset {offset}: {kind}")]
    Malformed { offset: u64, kind: MalformedKind },
    #[error("record {record} at offset {offset}: sink failed: {source}")]
    Sink {
        record: u64,
        offset: u64,
        #[source]
        source: SinkError,
    },
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Byte offset of the unit the error belongs to, if any.
    pub fn offset(&self) -> Option<u64> {
        match self {
            DecodeError::UnknownCode { offset, .. }
            | DecodeError::DuplicateCode { offset, .. }
            | DecodeError::Malformed { offset, .. }
            | DecodeError::Sink { offset, .. } => Some(*offset),
            DecodeError::Io(_) => None,
        }
    }

    pub(crate) fn from_dictionary(err: DictionaryError, offset: u64, record: u64) -> Self {
        match err {
            DictionaryError::UnknownCode(code) => DecodeError::UnknownCode {
                code,
                offset,
                record,
            },
            DictionaryError::DuplicateCode {
                code,
                existing,
                attempted,
            } => DecodeError::DuplicateCode {
                code,
                existing,
                attempted,
                offset,
            },
        }
    }
}
