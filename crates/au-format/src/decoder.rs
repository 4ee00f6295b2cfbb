//! Streaming decoder for au record streams.
//!
//! The decoder is an explicit state machine over a refillable buffer. Each
//! step frames one unit (tag, length, terminator), then dispatches its payload.
//! Dictionary units mutate the caller's [`Dictionary`] before the next unit is
//! read, so a record can only resolve codes defined strictly earlier.

use std::io::Read;

use au_core::{DictCode, Dictionary, Value};
use tracing::{debug, trace, warn};

use crate::buffer::StreamBuffer;
use crate::error::{DecodeError, MalformedKind, SinkError};
use crate::payload::{RecordError, read_definitions, read_header, read_record};
use crate::wire::{MAX_VARINT_BYTES, UNIT_TERMINATOR, UnitKind, VarintError, decode_varint};

/// Resource limits applied while decoding.
#[derive(Clone, Copy, Debug)]
pub struct DecodeLimits {
    /// Largest accepted payload length (default: 64 MiB).
    pub(crate) max_unit_len: u64,
    /// Deepest accepted container nesting (default: 1,024).
    pub(crate) max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_unit_len: 64 * 1024 * 1024,
            max_depth: 1024,
        }
    }
}

impl DecodeLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_unit_len(mut self, len: u64) -> Self {
        self.max_unit_len = len;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// One decoded top-level value.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub value: Value,
    /// Zero-based position among the stream's record units, skipped ones included.
    pub index: u64,
    /// Byte offset of the record unit.
    pub offset: u64,
}

/// Outcome of one decoding step.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Header { offset: u64, version: u64 },
    /// Definitions already applied to the dictionary, in stream order.
    Definitions {
        offset: u64,
        entries: Vec<(DictCode, String)>,
    },
    Record(Record),
}

/// Counters for one decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub units: u64,
    pub definitions: u64,
    pub records: u64,
    pub skipped_records: u64,
    pub resyncs: u64,
    pub skipped_bytes: u64,
}

/// Receives each decoded record before the decoder reads the next unit.
pub trait RecordHandler {
    fn handle(&mut self, record: Record) -> Result<(), SinkError>;
}

impl<F> RecordHandler for F
where
    F: FnMut(Record) -> Result<(), SinkError>,
{
    fn handle(&mut self, record: Record) -> Result<(), SinkError> {
        self(record)
    }
}

/// A unit whose bytes are fully buffered and correctly terminated.
#[derive(Clone, Copy, Debug)]
struct UnitFrame {
    kind: UnitKind,
    offset: u64,
    header_len: usize,
    payload_len: usize,
}

impl UnitFrame {
    /// `None` if the unit's total size does not fit in memory addressing.
    fn new(kind: UnitKind, offset: u64, header_len: usize, len: u64) -> Option<Self> {
        let payload_len = usize::try_from(len).ok()?;
        header_len.checked_add(payload_len)?.checked_add(1)?;
        Some(Self {
            kind,
            offset,
            header_len,
            payload_len,
        })
    }

    fn total_len(&self) -> usize {
        self.header_len + self.payload_len + 1
    }
}

enum State {
    ReadingUnitHeader,
    Dispatching(UnitFrame),
    Resynchronizing(DecodeError),
    Done,
}

/// Builder for [`Decoder`].
pub struct DecoderBuilder<R> {
    reader: R,
    limits: DecodeLimits,
    resume_on_error: bool,
}

impl<R: Read> DecoderBuilder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            limits: DecodeLimits::default(),
            resume_on_error: false,
        }
    }

    pub fn limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Skip corrupt units instead of failing the decode.
    pub fn resume_on_error(mut self, resume: bool) -> Self {
        self.resume_on_error = resume;
        self
    }

    pub fn build(self) -> Decoder<R> {
        Decoder {
            input: StreamBuffer::new(self.reader),
            state: State::ReadingUnitHeader,
            limits: self.limits,
            resume_on_error: self.resume_on_error,
            next_record: 0,
            stats: DecodeStats::default(),
        }
    }
}

/// Decodes one byte stream, unit by unit.
pub struct Decoder<R> {
    input: StreamBuffer<R>,
    state: State,
    limits: DecodeLimits,
    resume_on_error: bool,
    next_record: u64,
    stats: DecodeStats,
}

impl<R: Read> Decoder<R> {
    pub fn builder(reader: R) -> DecoderBuilder<R> {
        DecoderBuilder::new(reader)
    }

    pub fn new(reader: R) -> Self {
        DecoderBuilder::new(reader).build()
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Stream offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.input.offset()
    }

    /// Decode the whole stream, handing every record to `handler`.
    ///
    /// A handler error aborts the decode regardless of the resume policy.
    pub fn decode<H>(
        &mut self,
        dict: &mut Dictionary,
        handler: &mut H,
    ) -> Result<DecodeStats, DecodeError>
    where
        H: RecordHandler + ?Sized,
    {
        while let Some(event) = self.next_event(dict)? {
            let Event::Record(record) = event else {
                continue;
            };
            let (index, offset) = (record.index, record.offset);
            if let Err(source) = handler.handle(record) {
                self.state = State::Done;
                return Err(DecodeError::Sink {
                    record: index,
                    offset,
                    source,
                });
            }
        }
        Ok(self.stats)
    }

    /// Advance to the next header, dictionary or record unit.
    ///
    /// Returns `Ok(None)` at a clean end of stream. After an error the decoder
    /// is finished and keeps returning `Ok(None)`.
    pub fn next_event(&mut self, dict: &mut Dictionary) -> Result<Option<Event>, DecodeError> {
        loop {
            match std::mem::replace(&mut self.state, State::ReadingUnitHeader) {
                State::Done => {
                    self.state = State::Done;
                    return Ok(None);
                }
                State::ReadingUnitHeader => match self.read_frame() {
                    Ok(Some(frame)) => self.state = State::Dispatching(frame),
                    Ok(None) => {
                        self.state = State::Done;
                        return Ok(None);
                    }
                    Err(err @ DecodeError::Malformed { .. }) if self.resume_on_error => {
                        warn!(offset = err.offset(), error = %err, "corrupt unit framing, resynchronizing");
                        self.state = State::Resynchronizing(err);
                    }
                    Err(err) => return Err(self.fail(err)),
                },
                State::Dispatching(frame) => match self.dispatch(frame, dict) {
                    Ok(Some(event)) => return Ok(Some(event)),
                    Ok(None) => {}
                    Err(err) => return Err(self.fail(err)),
                },
                State::Resynchronizing(err) => match self.resynchronize() {
                    Ok(true) => {}
                    Ok(false) => return Err(self.fail(err)),
                    Err(io_err) => return Err(self.fail(io_err)),
                },
            }
        }
    }

    fn fail(&mut self, err: DecodeError) -> DecodeError {
        self.state = State::Done;
        err
    }

    /// Frame the unit at the cursor. `Ok(None)` means a clean end of stream.
    fn read_frame(&mut self) -> Result<Option<UnitFrame>, DecodeError> {
        if self.input.at_end()? {
            return Ok(None);
        }
        let offset = self.input.offset();
        match self.probe_frame()? {
            Ok(frame) => Ok(Some(frame)),
            Err(kind) => Err(DecodeError::Malformed { offset, kind }),
        }
    }

    /// Check that a complete, terminated unit starts at the cursor.
    ///
    /// Never consumes. The caller guarantees at least one byte is buffered.
    fn probe_frame(&mut self) -> std::io::Result<Result<UnitFrame, MalformedKind>> {
        let offset = self.input.offset();
        self.input.fill_to(1 + MAX_VARINT_BYTES)?;

        let head = self.input.available();
        let tag = head[0];
        let Some(kind) = UnitKind::from_tag(tag) else {
            return Ok(Err(MalformedKind::InvalidUnitTag(tag)));
        };
        let (len, len_bytes) = match decode_varint(&head[1..]) {
            Ok(decoded) => decoded,
            Err(VarintError::Truncated) => return Ok(Err(MalformedKind::TruncatedUnit)),
            Err(VarintError::Overlong) => return Ok(Err(MalformedKind::OverlongVarint)),
        };
        let too_large = MalformedKind::UnitTooLarge {
            len,
            limit: self.limits.max_unit_len,
        };
        if len > self.limits.max_unit_len {
            return Ok(Err(too_large));
        }
        let Some(frame) = UnitFrame::new(kind, offset, 1 + len_bytes, len) else {
            return Ok(Err(too_large));
        };
        if !self.input.fill_to(frame.total_len())? {
            return Ok(Err(MalformedKind::TruncatedUnit));
        }
        if self.input.available()[frame.total_len() - 1] != UNIT_TERMINATOR {
            return Ok(Err(MalformedKind::MissingTerminator));
        }
        Ok(Ok(frame))
    }

    /// Process a framed unit and consume it. `Ok(None)` means it was skipped.
    fn dispatch(
        &mut self,
        frame: UnitFrame,
        dict: &mut Dictionary,
    ) -> Result<Option<Event>, DecodeError> {
        let outcome = self.decode_unit(frame, dict);
        self.input.consume(frame.total_len());

        match outcome {
            Ok(event) => Ok(Some(event)),
            Err(err @ (DecodeError::Malformed { .. } | DecodeError::UnknownCode { .. }))
                if self.resume_on_error =>
            {
                warn!(offset = frame.offset, unit = frame.kind.name(), error = %err, "skipping corrupt unit");
                if frame.kind == UnitKind::Record {
                    self.stats.skipped_records += 1;
                }
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn decode_unit(
        &mut self,
        frame: UnitFrame,
        dict: &mut Dictionary,
    ) -> Result<Event, DecodeError> {
        let start = frame.header_len;
        let payload = &self.input.available()[start..start + frame.payload_len];
        let offset = frame.offset;
        let malformed = |kind| DecodeError::Malformed { offset, kind };
        self.stats.units += 1;

        match frame.kind {
            UnitKind::Header => {
                let version = read_header(payload).map_err(malformed)?;
                debug!(offset, version, "header");
                Ok(Event::Header { offset, version })
            }
            UnitKind::Dictionary => {
                let entries = read_definitions(payload).map_err(malformed)?;
                for (code, name) in &entries {
                    dict.define(*code, name)
                        .map_err(|e| DecodeError::from_dictionary(e, offset, self.next_record))?;
                }
                self.stats.definitions += entries.len() as u64;
                debug!(offset, count = entries.len(), "dictionary");
                Ok(Event::Definitions { offset, entries })
            }
            UnitKind::Record => {
                let index = self.next_record;
                self.next_record += 1;
                let value = read_record(payload, dict, self.limits.max_depth).map_err(|e| match e {
                    RecordError::Malformed(kind) => malformed(kind),
                    RecordError::UnknownCode(code) => DecodeError::UnknownCode {
                        code,
                        offset,
                        record: index,
                    },
                })?;
                self.stats.records += 1;
                trace!(offset, index, "record");
                Ok(Event::Record(Record {
                    value,
                    index,
                    offset,
                }))
            }
        }
    }

    /// Scan forward to the next plausible unit boundary.
    ///
    /// A boundary is a position right after a terminator byte where a whole,
    /// correctly terminated unit can be framed. Returns `false` if the stream
    /// ends first.
    fn resynchronize(&mut self) -> Result<bool, DecodeError> {
        let from = self.input.offset();
        // Step past the unit start that failed to frame.
        if self.input.fill_to(1)? {
            self.input.consume(1);
        }

        loop {
            match memchr::memchr(UNIT_TERMINATOR, self.input.available()) {
                Some(pos) => self.input.consume(pos + 1),
                None => {
                    self.input.consume_all();
                    if !self.input.fill_to(1)? {
                        return Ok(false);
                    }
                    continue;
                }
            }
            if !self.input.fill_to(1)? {
                return Ok(false);
            }
            if self.probe_frame()?.is_ok() {
                let to = self.input.offset();
                self.stats.resyncs += 1;
                self.stats.skipped_bytes += to - from;
                warn!(from, to, "resynchronized");
                return Ok(true);
            }
        }
    }
}
