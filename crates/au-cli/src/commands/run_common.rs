//! Shared logic for commands that read au streams.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use au_core::Dictionary;
use au_format::{DecodeError, DecodeStats, Decoder, EncodeError, RecordHandler};
use au_grep::PatternError;
use tracing::info;

/// One byte source named on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str("<stdin>"),
            Input::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Inputs in command-line order; no paths means stdin, as does `-`.
pub fn inputs(paths: &[PathBuf]) -> Vec<Input> {
    if paths.is_empty() {
        return vec![Input::Stdin];
    }
    paths
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                Input::Stdin
            } else {
                Input::File(path.clone())
            }
        })
        .collect()
}

pub fn open_input(input: &Input) -> Result<Box<dyn Read>, CommandError> {
    match input {
        Input::Stdin => Ok(Box::new(io::stdin().lock())),
        Input::File(path) => File::open(path)
            .map(|file| Box::new(file) as Box<dyn Read>)
            .map_err(|source| CommandError::Open {
                path: path.clone(),
                source,
            }),
    }
}

/// Decode every input in turn through one handler and one dictionary.
///
/// Later inputs may use codes defined by earlier ones. Stops at the first
/// input that fails.
pub fn decode_inputs<H>(
    paths: &[PathBuf],
    skip_corrupt: bool,
    handler: &mut H,
) -> Result<DecodeStats, CommandError>
where
    H: RecordHandler + ?Sized,
{
    let mut dict = Dictionary::new();
    let mut total = DecodeStats::default();

    for input in inputs(paths) {
        info!(input = %input, "decoding");
        let reader = open_input(&input)?;
        let mut decoder = Decoder::builder(reader)
            .resume_on_error(skip_corrupt)
            .build();
        let stats = decoder
            .decode(&mut dict, handler)
            .map_err(|source| CommandError::Decode {
                input: input.to_string(),
                source,
            })?;
        accumulate(&mut total, stats);
    }

    Ok(total)
}

fn accumulate(total: &mut DecodeStats, stats: DecodeStats) {
    total.units += stats.units;
    total.definitions += stats.definitions;
    total.records += stats.records;
    total.skipped_records += stats.skipped_records;
    total.resyncs += stats.resyncs;
    total.skipped_bytes += stats.skipped_bytes;
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Pattern(#[from] PatternError),
    #[error("failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{input}: {source}")]
    Decode {
        input: String,
        #[source]
        source: DecodeError,
    },
    #[error("{input}: invalid JSON: {source}")]
    Json {
        input: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Encode(#[from] EncodeError),
    #[error("write error: {0}")]
    Output(#[from] io::Error),
}

impl CommandError {
    /// 1 for usage and input problems, 2 once data processing has started.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Pattern(_) | CommandError::Open { .. } | CommandError::Create { .. } => {
                1
            }
            CommandError::Decode { .. }
            | CommandError::Json { .. }
            | CommandError::Encode(_)
            | CommandError::Output(_) => 2,
        }
    }
}

/// Report `result` and exit with its code.
pub fn finish<T>(result: Result<T, CommandError>) -> ! {
    match result {
        Ok(_) => std::process::exit(0),
        Err(err) if is_broken_pipe(&err) => std::process::exit(0),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

/// `au cat big.au | head` is not an error.
fn is_broken_pipe(err: &CommandError) -> bool {
    let io_err = match err {
        CommandError::Output(e) => Some(e),
        CommandError::Encode(EncodeError::Io(e)) => Some(e),
        CommandError::Decode {
            source: DecodeError::Sink { source, .. },
            ..
        } => std::error::Error::source(source).and_then(|e| e.downcast_ref::<io::Error>()),
        _ => None,
    };
    io_err.is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

/// Path display for log lines.
pub fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "<stdout>".to_owned(), |p| p.display().to_string())
}
