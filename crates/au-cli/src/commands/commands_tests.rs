use std::fs;
use std::path::{Path, PathBuf};

use au_core::{DictCode, Value};
use au_format::wire::{UnitKind, write_unit};
use au_format::{DecodeError, Encoder};
use au_grep::TypeSelection;
use indoc::indoc;

use super::cat::{self, CatArgs};
use super::dump::{self, DumpArgs};
use super::encode::{self, EncodeArgs};
use super::grep::{self, GrepArgs};
use super::run_common::CommandError;

fn encode_json(records: &[&str]) -> Vec<u8> {
    let mut encoder = Encoder::new(Vec::new()).unwrap();
    for text in records {
        let json: serde_json::Value = serde_json::from_str(text).unwrap();
        encoder.write_record(&Value::from(json)).unwrap();
    }
    encoder.finish().unwrap()
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn people() -> Vec<u8> {
    encode_json(&[
        r#"{"name": "alice", "age": 30}"#,
        r#"{"name": "bob", "age": 25}"#,
        r#"{"name": "carol", "tags": ["alice", 30.5]}"#,
    ])
}

fn grep_args(pattern: &str, key: Option<&str>, paths: Vec<PathBuf>) -> GrepArgs {
    GrepArgs {
        pattern: pattern.to_owned(),
        key: key.map(str::to_owned),
        selection: TypeSelection::default(),
        paths,
        pretty: false,
        color: false,
        skip_corrupt: false,
    }
}

fn run_grep(args: &GrepArgs) -> String {
    let mut out = Vec::new();
    grep::execute(args, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run_cat(paths: Vec<PathBuf>, skip_corrupt: bool) -> Result<String, CommandError> {
    let args = CatArgs {
        paths,
        pretty: false,
        color: false,
        skip_corrupt,
    };
    let mut out = Vec::new();
    cat::execute(&args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn grep_any_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "people.au", &people());

    let out = run_grep(&grep_args("alice", None, vec![path]));

    insta::assert_snapshot!(out, @r#"
    {"name":"alice","age":30}
    {"name":"carol","tags":["alice",30.5]}
    "#);
}

#[test]
fn grep_restricted_to_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "people.au", &people());

    let out = run_grep(&grep_args("alice", Some("name"), vec![path.clone()]));
    assert_eq!(out, "{\"name\":\"alice\",\"age\":30}\n");

    let out = run_grep(&grep_args("25", Some("age"), vec![path.clone()]));
    assert_eq!(out, "{\"name\":\"bob\",\"age\":25}\n");

    let out = run_grep(&grep_args("30", Some("name"), vec![path]));
    assert_eq!(out, "");
}

#[test]
fn grep_substring() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "people.au", &people());

    let mut args = grep_args("aro", None, vec![path]);
    args.selection.substring = true;

    assert_eq!(run_grep(&args), "{\"name\":\"carol\",\"tags\":[\"alice\",30.5]}\n");
}

#[test]
fn grep_double_matches_only_doubles() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "people.au", &people());

    let mut args = grep_args("30.5", None, vec![path]);
    args.selection.double = true;

    assert_eq!(run_grep(&args), "{\"name\":\"carol\",\"tags\":[\"alice\",30.5]}\n");
}

#[test]
fn grep_pretty_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "people.au", &people());

    let mut args = grep_args("bob", None, vec![path]);
    args.pretty = true;

    insta::assert_snapshot!(run_grep(&args), @r#"
    {
      "name": "bob",
      "age": 25
    }
    "#);
}

#[test]
fn grep_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "people.au", &people());

    let stats = grep::execute(&grep_args("30", None, vec![path]), Vec::new()).unwrap();

    assert_eq!(stats.records, 3);
    assert_eq!(stats.matched, 1);
}

#[test]
fn bad_pattern_fails_before_opening_inputs() {
    let mut args = grep_args("abc", None, vec![PathBuf::from("/nonexistent/people.au")]);
    args.selection.integer = true;

    let err = grep::execute(&args, Vec::new()).unwrap_err();

    assert!(matches!(err, CommandError::Pattern(_)));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(
        err.to_string(),
        "-i specified, but pattern 'abc' is not an integer."
    );
}

#[test]
fn missing_input_exits_with_one() {
    let err = run_cat(vec![PathBuf::from("/nonexistent/people.au")], false).unwrap_err();

    assert!(matches!(err, CommandError::Open { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn dictionary_carries_across_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let definitions = [(DictCode::new(1), "name")];

    let mut encoder = Encoder::new(Vec::new()).unwrap();
    encoder.define(&definitions).unwrap();
    let prefix = encoder.finish().unwrap();

    let mut encoder = Encoder::new(Vec::new()).unwrap();
    encoder.define(&definitions).unwrap();
    encoder
        .write_record(&Value::Object(vec![("name".into(), "alice".into())]))
        .unwrap();
    let full = encoder.finish().unwrap();

    // Second file: a header and a record that relies on the first file's dictionary.
    let mut records_only = full[..6].to_vec();
    records_only.extend_from_slice(&full[prefix.len()..]);

    let defs = write_file(dir.path(), "defs.au", &prefix);
    let data = write_file(dir.path(), "data.au", &records_only);

    let out = run_cat(vec![defs, data.clone()], false).unwrap();
    assert_eq!(out, "{\"name\":\"alice\"}\n");

    let err = run_cat(vec![data], false).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Decode {
            source: DecodeError::UnknownCode { .. },
            ..
        }
    ));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn corrupt_record_is_fatal_unless_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let first = encode_json(&[r#"{"n": 1}"#]);
    let both = encode_json(&[r#"{"n": 1}"#, r#"{"n": 2}"#]);

    let mut bytes = first.clone();
    write_unit(&mut bytes, UnitKind::Record, b"Z");
    bytes.extend_from_slice(&both[first.len()..]);
    let path = write_file(dir.path(), "corrupt.au", &bytes);

    let err = run_cat(vec![path.clone()], false).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().ends_with("invalid value tag 0x5a"));

    let out = run_cat(vec![path], true).unwrap();
    assert_eq!(out, "{\"n\":1}\n{\"n\":2}\n");
}

#[test]
fn encode_then_cat() {
    let dir = tempfile::tempdir().unwrap();
    let json = indoc! {r#"
        {"a": 1, "b": [true, null]}
        {"a": -2.5}  {"c": {"d": "e"}}
    "#};
    let input = write_file(dir.path(), "input.json", json.as_bytes());

    let args = EncodeArgs {
        paths: vec![input],
        output: None,
    };
    let mut encoded = Vec::new();
    let written = encode::execute(&args, &mut encoded).unwrap();
    assert_eq!(written, 3);

    let stream = write_file(dir.path(), "out.au", &encoded);
    insta::assert_snapshot!(run_cat(vec![stream], false).unwrap(), @r#"
    {"a":1,"b":[true,null]}
    {"a":-2.5}
    {"c":{"d":"e"}}
    "#);
}

#[test]
fn encode_rejects_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "input.json", b"{\"a\": 1}\n{\"a\": ");

    let args = EncodeArgs {
        paths: vec![input],
        output: None,
    };
    let err = encode::execute(&args, Vec::new()).unwrap_err();

    assert!(matches!(err, CommandError::Json { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn dump_lists_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "people.au",
        &encode_json(&[r#"{"name": "alice", "age": 30}"#]),
    );

    let args = DumpArgs {
        paths: vec![path],
        color: false,
        skip_corrupt: false,
    };
    let mut out = Vec::new();
    dump::execute(&args, &mut out).unwrap();

    insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r#"
    00000000  header  au v1
    00000006  dict    #1 "name"  #2 "age"
    00000015  record  #0 {"name":"alice","age":30}
    "#);
}
