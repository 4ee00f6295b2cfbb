#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for au streams.
//!
//! - [`Dictionary`]: the append-only code → key table a decode session grows
//! - [`Value`]: the decoded record tree
//! - [`Colors`]: terminal palette for rendering

mod colors;
mod dictionary;
mod value;

#[cfg(test)]
mod dictionary_tests;

pub use colors::Colors;
pub use dictionary::{DictCode, Dictionary, DictionaryError};
pub use value::Value;
