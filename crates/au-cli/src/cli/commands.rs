//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`. Commands
//! that read au streams accept the same rendering flags, with the ones they
//! ignore hidden from `--help`.

use clap::Command;

use super::args::*;

/// Add hidden rendering args (for commands that don't print JSON).
fn with_hidden_render_args(cmd: Command) -> Command {
    cmd.arg(compact_arg().hide(true))
}

/// Add hidden decode args (for commands that don't read au streams).
fn with_hidden_decode_args(cmd: Command) -> Command {
    cmd.arg(skip_corrupt_arg().hide(true))
        .arg(color_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("au")
        .about("Grep and inspect dictionary-compressed record streams")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(grep_command())
        .subcommand(cat_command())
        .subcommand(encode_command())
        .subcommand(dump_command())
}

/// Print records containing a value that matches a typed pattern.
pub fn grep_command() -> Command {
    Command::new("grep")
        .about("Print records containing a matching value")
        .override_usage("  au grep [OPTIONS] <PATTERN> [PATH]...")
        .after_help(
            r#"EXAMPLES:
  au grep alice data.au               # string, integer or double "alice"
  au grep -k age -i 30 data.au        # integer 30 under key "age"
  au grep -u error logs/*.au          # substring of any string
  cat data.au | au grep -d 1.5        # double from stdin

Without -i/-d/-s/-u, PATTERN is tried as every type it parses as."#,
        )
        .arg(pattern_arg())
        .arg(paths_arg())
        .arg(key_arg())
        .arg(integer_arg())
        .arg(double_arg())
        .arg(string_arg())
        .arg(substring_arg())
        .arg(color_arg())
        .arg(compact_arg())
        .arg(skip_corrupt_arg())
}

/// Print every record as JSON.
pub fn cat_command() -> Command {
    Command::new("cat")
        .about("Print every record as JSON")
        .override_usage("  au cat [OPTIONS] [PATH]...")
        .after_help(
            r#"EXAMPLES:
  au cat data.au                      # pretty on a terminal
  au cat --compact a.au b.au          # one record per line"#,
        )
        .arg(paths_arg())
        .arg(color_arg())
        .arg(compact_arg())
        .arg(skip_corrupt_arg())
}

/// Convert JSON documents to an au stream.
pub fn encode_command() -> Command {
    let cmd = Command::new("encode")
        .about("Convert JSON documents to an au stream")
        .override_usage("  au encode [-o FILE] [PATH]...")
        .after_help(
            r#"EXAMPLES:
  au encode records.jsonl -o records.au
  some-tool --json | au encode > out.au"#,
        )
        .arg(paths_arg())
        .arg(output_file_arg());

    with_hidden_render_args(with_hidden_decode_args(cmd))
}

/// List the units of an au stream.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("List the units of an au stream")
        .override_usage("  au dump [OPTIONS] [PATH]...")
        .after_help(
            r#"EXAMPLES:
  au dump data.au
  au dump --skip-corrupt damaged.au"#,
        )
        .arg(paths_arg())
        .arg(color_arg())
        .arg(skip_corrupt_arg());

    with_hidden_render_args(cmd)
}
