//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the relevant fields, ignoring hidden ones
//! - `Into<*Args>` impls resolve terminal-dependent choices (color, pretty)

use std::path::PathBuf;

use au_grep::TypeSelection;
use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::cat::CatArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::encode::EncodeArgs;
use crate::commands::grep::GrepArgs;

pub struct GrepParams {
    pub pattern: String,
    pub paths: Vec<PathBuf>,
    pub key: Option<String>,
    pub integer: bool,
    pub double: bool,
    pub string: bool,
    pub substring: bool,
    pub compact: bool,
    pub skip_corrupt: bool,
    pub color: ColorChoice,
}

impl GrepParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pattern: m.get_one::<String>("pattern").cloned().unwrap_or_default(),
            paths: parse_paths(m),
            key: m.get_one::<String>("key").cloned(),

            // Type selection
            integer: m.get_flag("integer"),
            double: m.get_flag("double"),
            string: m.get_flag("string"),
            substring: m.get_flag("substring"),

            compact: m.get_flag("compact"),
            skip_corrupt: m.get_flag("skip_corrupt"),
            color: parse_color(m),
        }
    }
}

impl From<GrepParams> for GrepArgs {
    fn from(p: GrepParams) -> Self {
        Self {
            pattern: p.pattern,
            key: p.key,
            selection: TypeSelection {
                integer: p.integer,
                double: p.double,
                string: p.string,
                substring: p.substring,
            },
            paths: p.paths,
            pretty: is_pretty(p.compact),
            color: p.color.should_colorize(),
            skip_corrupt: p.skip_corrupt,
        }
    }
}

pub struct CatParams {
    pub paths: Vec<PathBuf>,
    pub compact: bool,
    pub skip_corrupt: bool,
    pub color: ColorChoice,
}

impl CatParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            paths: parse_paths(m),
            compact: m.get_flag("compact"),
            skip_corrupt: m.get_flag("skip_corrupt"),
            color: parse_color(m),
        }
    }
}

impl From<CatParams> for CatArgs {
    fn from(p: CatParams) -> Self {
        Self {
            paths: p.paths,
            pretty: is_pretty(p.compact),
            color: p.color.should_colorize(),
            skip_corrupt: p.skip_corrupt,
        }
    }
}

pub struct EncodeParams {
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    // Note: compact, color and skip_corrupt are parsed but not extracted
}

impl EncodeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            paths: parse_paths(m),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

impl From<EncodeParams> for EncodeArgs {
    fn from(p: EncodeParams) -> Self {
        Self {
            paths: p.paths,
            output: p.output,
        }
    }
}

pub struct DumpParams {
    pub paths: Vec<PathBuf>,
    pub skip_corrupt: bool,
    pub color: ColorChoice,
    // Note: compact is parsed but not extracted
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            paths: parse_paths(m),
            skip_corrupt: m.get_flag("skip_corrupt"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            paths: p.paths,
            color: p.color.should_colorize(),
            skip_corrupt: p.skip_corrupt,
        }
    }
}

fn parse_paths(m: &ArgMatches) -> Vec<PathBuf> {
    m.get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn is_pretty(compact: bool) -> bool {
    !compact && std::io::IsTerminal::is_terminal(&std::io::stdout())
}
