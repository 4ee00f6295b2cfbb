#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Binary format for au record streams.
//!
//! - [`wire`]: unit framing, value markers and varints
//! - [`Decoder`]: unit-at-a-time streaming decoder with optional resynchronization
//! - [`Encoder`]: writer that interns keys on first use
//! - [`dump`]: human-readable unit listing

mod buffer;
mod decoder;
mod encoder;
mod error;
mod payload;

pub mod dump;
pub mod wire;


pub use decoder::{
    DecodeLimits, DecodeStats, Decoder, DecoderBuilder, Event, Record, RecordHandler,
};
pub use encoder::{EncodeError, Encoder, definitions_payload};
pub use error::{DecodeError, MalformedKind, SinkError};
