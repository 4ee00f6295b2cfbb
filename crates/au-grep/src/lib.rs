#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Typed grep over au record streams.
//!
//! Build a [`Pattern`], wrap it and a [`RecordSink`] in a [`GrepHandler`],
//! and hand the handler to [`au_format::Decoder::decode`].

mod handler;
mod matcher;
mod pattern;
mod sink;
mod trace;

#[cfg(test)]
mod handler_tests;
#[cfg(test)]
mod sink_tests;

pub use handler::{GrepHandler, GrepStats};
pub use matcher::{Matcher, matches};
pub use pattern::{MatchMode, Pattern, PatternBuilder, PatternError, StringPattern, TypeSelection};
pub use sink::{JsonSink, RecordSink};
pub use trace::{CountingTracer, NoopTracer, Tracer};
