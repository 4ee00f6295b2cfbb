//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Flag conflicts: -u rejects -i and -d
//! 2. Hidden flags: accepted without error, absent from --help
//! 3. Params extraction: correct fields are extracted from ArgMatches

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{cat_command, dump_command, encode_command, grep_command};

#[test]
fn grep_extracts_all_flags() {
    let m = grep_command()
        .try_get_matches_from([
            "grep", "-k", "age", "-i", "--compact", "--skip-corrupt", "--color", "never", "30",
            "a.au", "b.au",
        ])
        .unwrap();
    let params = GrepParams::from_matches(&m);

    assert_eq!(params.pattern, "30");
    assert_eq!(params.key.as_deref(), Some("age"));
    assert!(params.integer);
    assert!(!params.double && !params.string && !params.substring);
    assert!(params.compact);
    assert!(params.skip_corrupt);
    assert_eq!(params.color, ColorChoice::Never);
    assert_eq!(
        params.paths,
        [PathBuf::from("a.au"), PathBuf::from("b.au")]
    );
}

#[test]
fn grep_without_paths_reads_stdin() {
    let m = grep_command().try_get_matches_from(["grep", "alice"]).unwrap();
    let params = GrepParams::from_matches(&m);
    assert!(params.paths.is_empty());
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn grep_requires_pattern() {
    let result = grep_command().try_get_matches_from(["grep"]);
    assert!(result.is_err());
}

#[test]
fn substring_conflicts_with_integer_and_double() {
    for flag in ["-i", "-d"] {
        let result = grep_command().try_get_matches_from(["grep", "-u", flag, "5"]);
        let err = result.err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}

#[test]
fn substring_combines_with_string() {
    let m = grep_command()
        .try_get_matches_from(["grep", "-s", "-u", "err"])
        .unwrap();
    let params = GrepParams::from_matches(&m);
    assert!(params.string && params.substring);
}

#[test]
fn cat_extracts_flags() {
    let m = cat_command()
        .try_get_matches_from(["cat", "--color", "always", "-"])
        .unwrap();
    let params = CatParams::from_matches(&m);
    assert_eq!(params.color, ColorChoice::Always);
    assert_eq!(params.paths, [PathBuf::from("-")]);
    assert!(!params.compact);
}

#[test]
fn encode_accepts_hidden_flags() {
    let m = encode_command()
        .try_get_matches_from(["encode", "-o", "out.au", "--compact", "--skip-corrupt", "in.json"])
        .unwrap();
    let params = EncodeParams::from_matches(&m);
    assert_eq!(params.output, Some(PathBuf::from("out.au")));
    assert_eq!(params.paths, [PathBuf::from("in.json")]);
}

#[test]
fn dump_accepts_compact() {
    let m = dump_command()
        .try_get_matches_from(["dump", "--compact", "--skip-corrupt", "x.au"])
        .unwrap();
    let params = DumpParams::from_matches(&m);
    assert!(params.skip_corrupt);
    assert_eq!(params.paths, [PathBuf::from("x.au")]);
}

#[test]
fn hidden_flags_stay_out_of_help() {
    let help = encode_command().render_help().to_string();
    assert!(help.contains("--output"));
    assert!(!help.contains("--compact"));
    assert!(!help.contains("--skip-corrupt"));
    assert!(!help.contains("--color"));

    let help = dump_command().render_help().to_string();
    assert!(help.contains("--skip-corrupt"));
    assert!(!help.contains("--compact"));
}

#[test]
fn cli_requires_subcommand() {
    let result = build_cli().try_get_matches_from(["au"]);
    assert!(result.is_err());

    let m = build_cli().try_get_matches_from(["au", "cat"]).unwrap();
    assert_eq!(m.subcommand_name(), Some("cat"));
}

#[test]
fn grep_args_carry_type_selection() {
    let m = grep_command()
        .try_get_matches_from(["grep", "-d", "--compact", "1.5"])
        .unwrap();
    let args: crate::commands::grep::GrepArgs = GrepParams::from_matches(&m).into();
    assert!(args.selection.double);
    assert!(!args.selection.integer);
    assert!(!args.pretty);
}
