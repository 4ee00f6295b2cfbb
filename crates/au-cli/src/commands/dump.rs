use std::io::{self, Write};
use std::path::PathBuf;

use au_core::{Colors, Dictionary};
use au_format::Decoder;
use au_format::dump::format_event;
use tracing::info;

use super::run_common::{CommandError, finish, inputs, open_input};

pub struct DumpArgs {
    pub paths: Vec<PathBuf>,
    pub color: bool,
    pub skip_corrupt: bool,
}

pub fn run(args: DumpArgs) {
    let stdout = io::stdout().lock();
    finish(execute(&args, stdout));
}

/// List every unit of every input. Offsets restart at zero for each input.
pub fn execute<W: Write>(args: &DumpArgs, mut out: W) -> Result<(), CommandError> {
    let colors = Colors::new(args.color);
    let mut dict = Dictionary::new();

    for input in inputs(&args.paths) {
        info!(input = %input, "dumping");
        let mut decoder = Decoder::builder(open_input(&input)?)
            .resume_on_error(args.skip_corrupt)
            .build();
        loop {
            let event = decoder
                .next_event(&mut dict)
                .map_err(|source| CommandError::Decode {
                    input: input.to_string(),
                    source,
                })?;
            let Some(event) = event else {
                break;
            };
            writeln!(out, "{}", format_event(&event, colors))?;
        }
    }

    out.flush()?;
    Ok(())
}
