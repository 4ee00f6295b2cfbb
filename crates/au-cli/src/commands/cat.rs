use std::io::{self, Write};
use std::path::PathBuf;

use au_core::Colors;
use au_format::{DecodeStats, Record, SinkError};
use au_grep::{JsonSink, RecordSink};

use super::run_common::{CommandError, decode_inputs, finish};

pub struct CatArgs {
    pub paths: Vec<PathBuf>,
    pub pretty: bool,
    pub color: bool,
    pub skip_corrupt: bool,
}

pub fn run(args: CatArgs) {
    let stdout = io::stdout().lock();
    finish(execute(&args, stdout));
}

pub fn execute<W: Write>(args: &CatArgs, out: W) -> Result<DecodeStats, CommandError> {
    let mut sink = JsonSink::new(out)
        .pretty(args.pretty)
        .colors(Colors::new(args.color));
    let stats = decode_inputs(
        &args.paths,
        args.skip_corrupt,
        &mut |record: Record| -> Result<(), SinkError> { sink.emit(record) },
    )?;
    sink.into_inner().flush()?;
    Ok(stats)
}
