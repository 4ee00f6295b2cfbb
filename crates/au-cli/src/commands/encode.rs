use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use au_core::Value;
use au_format::Encoder;
use tracing::info;

use super::run_common::{CommandError, display_path, finish, inputs, open_input};

pub struct EncodeArgs {
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

pub fn run(args: EncodeArgs) {
    let result = match &args.output {
        Some(path) => File::create(path)
            .map_err(|source| CommandError::Create {
                path: path.clone(),
                source,
            })
            .and_then(|file| execute(&args, BufWriter::new(file))),
        None => execute(&args, io::stdout().lock()),
    };
    finish(result);
}

/// Encode whitespace-separated JSON documents from every input into one stream.
///
/// Returns the number of records written.
pub fn execute<W: Write>(args: &EncodeArgs, out: W) -> Result<u64, CommandError> {
    let mut encoder = Encoder::new(out)?;
    let mut written = 0;

    for input in inputs(&args.paths) {
        info!(input = %input, output = %display_path(args.output.as_deref()), "encoding");
        let reader = io::BufReader::new(open_input(&input)?);
        for document in serde_json::Deserializer::from_reader(reader).into_iter::<serde_json::Value>() {
            let document = document.map_err(|source| CommandError::Json {
                input: input.to_string(),
                source,
            })?;
            encoder.write_record(&Value::from(document))?;
            written += 1;
        }
    }

    encoder.finish()?.flush()?;
    Ok(written)
}
