use std::io::{self, Write};
use std::path::PathBuf;

use au_core::Colors;
use au_grep::{GrepHandler, GrepStats, JsonSink, Pattern, TypeSelection};
use tracing::info;

use super::run_common::{CommandError, decode_inputs, finish};

pub struct GrepArgs {
    pub pattern: String,
    pub key: Option<String>,
    pub selection: TypeSelection,
    pub paths: Vec<PathBuf>,
    pub pretty: bool,
    pub color: bool,
    pub skip_corrupt: bool,
}

pub fn run(args: GrepArgs) {
    let stdout = io::stdout().lock();
    finish(execute(&args, stdout));
}

/// Grep every input, writing matching records to `out`.
///
/// The pattern is validated before any input is opened.
pub fn execute<W: Write>(args: &GrepArgs, out: W) -> Result<GrepStats, CommandError> {
    let pattern = Pattern::from_literal(&args.pattern, args.key.as_deref(), args.selection)?;

    let sink = JsonSink::new(out)
        .pretty(args.pretty)
        .colors(Colors::new(args.color));
    let mut handler = GrepHandler::new(&pattern, sink);
    let decoded = decode_inputs(&args.paths, args.skip_corrupt, &mut handler)?;

    let stats = handler.stats();
    info!(
        records = stats.records,
        matched = stats.matched,
        skipped = decoded.skipped_records,
        "grep finished"
    );
    handler.into_sink().into_inner().flush()?;
    Ok(stats)
}
