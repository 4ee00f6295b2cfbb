//! Human-readable listing of a stream's units.
//!
//! One line per unit:
//!
//! ```text
//! 00000000  header  au v1
//! 00000006  dict    #1 "name"  #2 "age"
//! 00000015  record  #0 {"name":"alice","age":30}
//! ```

use std::io::Read;

use au_core::{Colors, Dictionary, Value};

use crate::decoder::{Decoder, Event};
use crate::error::DecodeError;

/// Dump every unit of `bytes` with a fresh dictionary.
pub fn dump(bytes: &[u8], colors: Colors) -> Result<String, DecodeError> {
    let mut dict = Dictionary::new();
    let mut decoder = Decoder::new(bytes);
    dump_events(&mut decoder, &mut dict, colors)
}

/// Dump the remaining units of `decoder`.
pub fn dump_events<R: Read>(
    decoder: &mut Decoder<R>,
    dict: &mut Dictionary,
    colors: Colors,
) -> Result<String, DecodeError> {
    let mut out = String::new();
    while let Some(event) = decoder.next_event(dict)? {
        out.push_str(&format_event(&event, colors));
        out.push('\n');
    }
    Ok(out)
}

/// Format one event as a dump line, without the trailing newline.
pub fn format_event(event: &Event, colors: Colors) -> String {
    let c = &colors;
    let mut out = String::new();

    let (offset, kind) = match event {
        Event::Header { offset, .. } => (*offset, "header"),
        Event::Definitions { offset, .. } => (*offset, "dict"),
        Event::Record(record) => (record.offset, "record"),
    };
    out.push_str(&format!(
        "{}{offset:08x}{}  {}{kind:<6}{}  ",
        c.dim, c.reset, c.blue, c.reset
    ));

    match event {
        Event::Header { version, .. } => {
            out.push_str(&format!("au v{version}"));
        }
        Event::Definitions { entries, .. } => {
            for (i, (code, name)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                out.push_str(&format!("{}{code}{} ", c.dim, c.reset));
                out.push_str(&Value::from(name.as_str()).format(false, colors));
            }
        }
        Event::Record(record) => {
            out.push_str(&format!("{}#{}{} ", c.dim, record.index, c.reset));
            out.push_str(&record.value.format(false, colors));
        }
    }

    out
}
