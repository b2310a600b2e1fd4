//! Decode-then-render pipeline
//!
//! A conversion either completes and hands the text to the sink once, or
//! fails before the sink is touched.

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use jianpu_core::{NotationRenderer, OutputSink, Score, ScoreError};
use log::{error, info};
use thiserror::Error;

use crate::midi::{self, DecodeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Standard MIDI File
    Midi,
    /// Score serialized as JSON
    Json,
}

impl InputFormat {
    /// Guess the format from the file extension
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mid" | "midi" => Some(InputFormat::Midi),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("Failed to read score file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output: {0}")]
    Sink(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub tracks_rendered: usize,
    pub notes: usize,
}

/// Decode a raw payload into a score
pub fn decode_bytes(bytes: &[u8], format: InputFormat) -> Result<Score, ConvertError> {
    let score = match format {
        InputFormat::Midi => midi::decode(bytes)?,
        InputFormat::Json => Score::from_json_slice(bytes)?,
    };
    Ok(score)
}

pub fn load_score(path: &Path, format: InputFormat) -> Result<Score, ConvertError> {
    let bytes = std::fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes, format)
}

/// Decode `bytes`, render them and hand the text to `sink`.
///
/// Decode failures are logged and returned; the sink keeps its old content.
pub fn convert_bytes<S>(
    bytes: &[u8],
    format: InputFormat,
    sink: &mut S,
) -> Result<ConvertSummary, ConvertError>
where
    S: OutputSink<Error = io::Error>,
{
    let score = decode_bytes(bytes, format).map_err(|err| {
        error!("Error decoding score: {}", err);
        err
    })?;
    render_score(&score, sink)
}

/// Same as [`convert_bytes`], reading the payload from `path`
pub fn convert_file<S>(
    path: &Path,
    format: InputFormat,
    sink: &mut S,
) -> Result<ConvertSummary, ConvertError>
where
    S: OutputSink<Error = io::Error>,
{
    let score = load_score(path, format).map_err(|err| {
        error!("Error decoding {}: {}", path.display(), err);
        err
    })?;
    render_score(&score, sink)
}

fn render_score<S>(score: &Score, sink: &mut S) -> Result<ConvertSummary, ConvertError>
where
    S: OutputSink<Error = io::Error>,
{
    let summary = ConvertSummary {
        tracks_rendered: score.tracks.iter().filter(|track| !track.is_empty()).count(),
        notes: score.note_count(),
    };

    NotationRenderer::new()
        .render_to(score, sink)
        .map_err(ConvertError::Sink)?;

    info!(
        "Rendered {} notes across {} tracks",
        summary.notes, summary.tracks_rendered
    );
    Ok(summary)
}
