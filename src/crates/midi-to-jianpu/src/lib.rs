//! MIDI to Jianpu converter library
//!
//! Decodes Standard MIDI Files (or JSON scores) into a [`jianpu_core::Score`]
//! and renders them as numbered musical notation text.

pub mod convert;
pub mod midi;
pub mod sink;

// Re-export main types for convenience
pub use convert::{convert_bytes, convert_file, load_score, ConvertError, ConvertSummary, InputFormat};
pub use midi::{decode, decode_file, DecodeError};
pub use sink::{FileSink, StdoutSink};
