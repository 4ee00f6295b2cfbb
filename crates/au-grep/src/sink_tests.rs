use std::io::{self, Write};

use au_core::{Colors, Value};
use au_format::Record;

use crate::{JsonSink, RecordSink};

fn record(text: &str) -> Record {
    let json: serde_json::Value = serde_json::from_str(text).unwrap();
    Record {
        value: Value::from(json),
        index: 0,
        offset: 0,
    }
}

fn render(sink: JsonSink<Vec<u8>>, records: &[&str]) -> String {
    let mut sink = sink;
    for text in records {
        sink.emit(record(text)).unwrap();
    }
    String::from_utf8(sink.into_inner()).unwrap()
}

#[test]
fn compact_lines() {
    let out = render(
        JsonSink::new(Vec::new()),
        &[r#"{"b": 1, "a": [true, null]}"#, r#""plain""#],
    );
    insta::assert_snapshot!(out, @r#"
    {"b":1,"a":[true,null]}
    "plain"
    "#);
}

#[test]
fn pretty_output() {
    let out = render(
        JsonSink::new(Vec::new()).pretty(true),
        &[r#"{"name": "alice", "tags": ["x"]}"#],
    );
    insta::assert_snapshot!(out, @r#"
    {
      "name": "alice",
      "tags": [
        "x"
      ]
    }
    "#);
}

#[test]
fn colored_output() {
    let out = render(
        JsonSink::new(Vec::new()).colors(Colors::ON),
        &[r#"{"k": "v"}"#],
    );
    assert_eq!(
        out,
        "\x1b[2m{\x1b[0m\x1b[34m\"k\"\x1b[0m\x1b[2m:\x1b[0m\x1b[32m\"v\"\x1b[0m\x1b[2m}\x1b[0m\n"
    );
}

struct Closed;

impl Write for Closed {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_is_sink_error() {
    let mut sink = JsonSink::new(Closed);
    let err = sink.emit(record("1")).unwrap_err();
    assert!(err.to_string().contains("pipe closed"));
}
