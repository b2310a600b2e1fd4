use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used for tracks without a usable name
pub const UNTITLED: &str = "Untitled";

/// A single timed note.
///
/// Times are unit-agnostic: only the relative spacing between onsets and
/// durations matters to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub start_time: f64,
    pub duration: f64,
    /// Absolute semitone index, 60 = middle C
    #[serde(rename = "pitchNumber")]
    pub pitch: i32,
}

impl Note {
    pub fn new(start_time: f64, duration: f64, pitch: i32) -> Self {
        Self {
            start_time,
            duration,
            pitch,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Track {
    pub fn new(name: Option<String>, notes: Vec<Note>) -> Self {
        Self { name, notes }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Name shown in the track header as given, `"Untitled"` when missing or empty
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNTITLED,
        }
    }
}

/// A decoded score: tracks in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Invalid score JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Score {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a score from its JSON form (`{"tracks": [{"name", "notes"}]}`)
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ScoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ScoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|track| track.notes.len()).sum()
    }
}
