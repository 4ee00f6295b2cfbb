//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that commands compose. The same
//! definition can be attached hidden (via `.hide(true)`) to commands that
//! accept but ignore it.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Literal to search for (positional).
pub fn pattern_arg() -> Arg {
    Arg::new("pattern")
        .value_name("PATTERN")
        .required(true)
        .help("Value to search for")
}

/// Input streams (positional, repeatable).
pub fn paths_arg() -> Arg {
    Arg::new("paths")
        .value_name("PATH")
        .num_args(0..)
        .value_parser(value_parser!(PathBuf))
        .help("Input files (stdin when omitted or \"-\")")
}

/// Key filter (-k/--key).
pub fn key_arg() -> Arg {
    Arg::new("key")
        .short('k')
        .long("key")
        .value_name("KEY")
        .help("Match only values under object key KEY, at any depth")
}

/// Integer interpretation (-i/--integer).
pub fn integer_arg() -> Arg {
    Arg::new("integer")
        .short('i')
        .long("integer")
        .action(ArgAction::SetTrue)
        .help("Match PATTERN with integer values")
}

/// Double interpretation (-d/--double).
pub fn double_arg() -> Arg {
    Arg::new("double")
        .short('d')
        .long("double")
        .action(ArgAction::SetTrue)
        .help("Match PATTERN with double-precision float values")
}

/// Exact string interpretation (-s/--string).
pub fn string_arg() -> Arg {
    Arg::new("string")
        .short('s')
        .long("string")
        .action(ArgAction::SetTrue)
        .help("Match PATTERN with string values")
}

/// Substring interpretation (-u/--substring).
pub fn substring_arg() -> Arg {
    Arg::new("substring")
        .short('u')
        .long("substring")
        .action(ArgAction::SetTrue)
        .conflicts_with_all(["integer", "double"])
        .help("Match PATTERN as a substring of string values (implies -s)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON (default: pretty when stdout is a TTY)")
}

/// Resume after corrupt units (--skip-corrupt).
pub fn skip_corrupt_arg() -> Arg {
    Arg::new("skip_corrupt")
        .long("skip-corrupt")
        .action(ArgAction::SetTrue)
        .help("Skip corrupt units and resynchronize instead of failing")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file")
}
