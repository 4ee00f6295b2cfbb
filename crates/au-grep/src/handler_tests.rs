use au_core::{Dictionary, Value};
use au_format::{DecodeError, Decoder, Encoder, Record, RecordHandler, SinkError};

use crate::{GrepHandler, GrepStats, Pattern, RecordSink};

fn json(text: &str) -> Value {
    Value::from(serde_json::from_str::<serde_json::Value>(text).unwrap())
}

fn encode(records: &[&str]) -> Vec<u8> {
    let mut encoder = Encoder::new(Vec::new()).unwrap();
    for text in records {
        encoder.write_record(&json(text)).unwrap();
    }
    encoder.finish().unwrap()
}

#[test]
fn forwards_only_matches() {
    let bytes = encode(&[
        r#"{"name": "alice", "age": 30}"#,
        r#"{"name": "bob", "age": 31}"#,
        r#"{"name": "carol", "age": 30}"#,
    ]);
    let pattern = Pattern::builder().key("age").unsigned(30).build();

    let mut handler = GrepHandler::new(&pattern, Vec::<Record>::new());
    let mut dict = Dictionary::new();
    Decoder::new(bytes.as_slice())
        .decode(&mut dict, &mut handler)
        .unwrap();

    assert_eq!(handler.stats(), GrepStats { records: 3, matched: 2 });
    let hits: Vec<_> = handler.into_sink().into_iter().map(|r| r.index).collect();
    assert_eq!(hits, [0, 2]);
}

#[test]
fn stats_accumulate_across_streams() {
    let first = encode(&[r#"{"k": "v"}"#]);
    let second = encode(&[r#"{"k": "w"}"#, r#"{"k": "v"}"#]);
    let pattern = Pattern::builder().exact("v").build();

    let mut handler = GrepHandler::new(&pattern, Vec::<Record>::new());
    let mut dict = Dictionary::new();
    for bytes in [&first, &second] {
        Decoder::new(bytes.as_slice())
            .decode(&mut dict, &mut handler)
            .unwrap();
    }

    assert_eq!(handler.stats(), GrepStats { records: 3, matched: 2 });
}

struct Refusing;

impl RecordSink for Refusing {
    fn emit(&mut self, _record: Record) -> Result<(), SinkError> {
        Err(SinkError::new("broken pipe"))
    }
}

#[test]
fn sink_failure_aborts_decode() {
    let bytes = encode(&[r#"{"a": "miss"}"#, r#"{"a": "hit"}"#, r#"{"a": "hit"}"#]);
    let pattern = Pattern::builder().exact("hit").build();

    let mut handler = GrepHandler::new(&pattern, Refusing);
    let mut dict = Dictionary::new();
    let err = Decoder::new(bytes.as_slice())
        .decode(&mut dict, &mut handler)
        .unwrap_err();

    assert!(matches!(err, DecodeError::Sink { record: 1, .. }));
    assert_eq!(handler.stats(), GrepStats { records: 2, matched: 1 });
}

#[test]
fn handler_is_a_record_handler() {
    let pattern = Pattern::builder().signed(1).build();
    let mut handler = GrepHandler::new(&pattern, Vec::<Record>::new());
    let record = Record {
        value: json("[1]"),
        index: 0,
        offset: 0,
    };
    handler.handle(record.clone()).unwrap();
    assert_eq!(handler.sink_mut().as_slice(), [record]);
}
