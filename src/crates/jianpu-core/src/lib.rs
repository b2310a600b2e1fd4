//! Score model and Jianpu renderer
//!
//! This crate turns a decoded score (tracks of timed notes) into numbered
//! musical notation text. Notes sharing an onset become chords joined by `/`,
//! silences between onsets become rest markers, and durations are spelled
//! out as proportional whitespace.
//!
//! # Examples
//!
//! ```
//! use jianpu_core::{render, Note, Score, Track};
//!
//! let score = Score::new(vec![Track::new(
//!     Some("Melody".into()),
//!     vec![Note::new(0.0, 0.25, 60), Note::new(0.25, 0.25, 62)],
//! )]);
//!
//! assert_eq!(render(&score), "Track: Melody\n\n1  ~  2  \n\n");
//! ```
//!
//! # Main Components
//!
//! - **Score / Track / Note**: the input model, loadable from JSON
//! - **notation**: pitch number to degree symbol with octave brackets
//! - **NotationRenderer**: grouping, rest detection and spacing
//! - **OutputSink**: where the rendered text ends up

pub mod model;
pub mod notation;
pub mod render;
pub mod sink;

pub use model::{Note, Score, ScoreError, Track, UNTITLED};
pub use notation::{jianpu_symbol, Register};
pub use render::{group_notes, render, NotationRenderer, NoteGroup};
pub use sink::OutputSink;
