mod cli;
mod commands;

use cli::{CatParams, DumpParams, EncodeParams, GrepParams, build_cli};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("grep", m)) => {
            let params = GrepParams::from_matches(m);
            commands::grep::run(params.into());
        }
        Some(("cat", m)) => {
            let params = CatParams::from_matches(m);
            commands::cat::run(params.into());
        }
        Some(("encode", m)) => {
            let params = EncodeParams::from_matches(m);
            commands::encode::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// Diagnostics go to stderr, filtered by `AU_LOG` (default: warn).
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("AU_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
