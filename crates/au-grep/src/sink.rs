//! Destinations for matched records.

use std::io::Write;

use au_core::Colors;
use au_format::{Record, SinkError};

/// Receives matched records in stream order. An error aborts the decode.
pub trait RecordSink {
    fn emit(&mut self, record: Record) -> Result<(), SinkError>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, record: Record) -> Result<(), SinkError> {
        (**self).emit(record)
    }
}

impl RecordSink for Vec<Record> {
    fn emit(&mut self, record: Record) -> Result<(), SinkError> {
        self.push(record);
        Ok(())
    }
}

/// Writes one JSON document per record.
pub struct JsonSink<W: Write> {
    out: W,
    pretty: bool,
    colors: Colors,
}

impl<W: Write> JsonSink<W> {
    /// Compact, uncolored output.
    pub fn new(out: W) -> Self {
        Self {
            out,
            pretty: false,
            colors: Colors::OFF,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for JsonSink<W> {
    fn emit(&mut self, record: Record) -> Result<(), SinkError> {
        let value = &record.value;
        if self.colors.is_enabled() {
            self.out
                .write_all(value.format(self.pretty, self.colors).as_bytes())?;
        } else if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, value).map_err(SinkError::new)?;
        } else {
            serde_json::to_writer(&mut self.out, value).map_err(SinkError::new)?;
        }
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
