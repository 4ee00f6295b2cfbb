//! Decoder-facing glue: match each record, forward hits to a sink.

use au_format::{Record, RecordHandler, SinkError};
use tracing::trace;

use crate::matcher::Matcher;
use crate::pattern::Pattern;
use crate::sink::RecordSink;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrepStats {
    pub records: u64,
    pub matched: u64,
}

/// Record handler that forwards matching records to `S` and drops the rest.
///
/// One handler can serve several decoders in turn; its stats accumulate.
pub struct GrepHandler<'p, S> {
    matcher: Matcher<'p>,
    sink: S,
    stats: GrepStats,
}

impl<'p, S: RecordSink> GrepHandler<'p, S> {
    pub fn new(pattern: &'p Pattern, sink: S) -> Self {
        Self {
            matcher: Matcher::new(pattern),
            sink,
            stats: GrepStats::default(),
        }
    }

    pub fn stats(&self) -> GrepStats {
        self.stats
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: RecordSink> RecordHandler for GrepHandler<'_, S> {
    fn handle(&mut self, record: Record) -> Result<(), SinkError> {
        self.stats.records += 1;
        if !self.matcher.matches(&record.value) {
            return Ok(());
        }
        self.stats.matched += 1;
        trace!(index = record.index, offset = record.offset, "match");
        self.sink.emit(record)
    }
}
