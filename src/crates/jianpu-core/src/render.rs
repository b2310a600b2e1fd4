use crate::model::{Note, Score, Track};
use crate::notation::jianpu_symbol;
use crate::sink::OutputSink;

/// One time unit of the score equals four beats of spacing
pub const BEATS_PER_TIME_UNIT: f64 = 4.0;

/// Whitespace characters emitted per beat of duration
pub const SPACES_PER_BEAT: f64 = 2.0;

/// Onsets are bucketed on hundredths of a time unit to absorb decoder jitter
pub const ONSET_RESOLUTION: f64 = 100.0;

/// Rests of at least this many beats use the full rest symbol
pub const FULL_REST_THRESHOLD: f64 = 1.0;

pub const FULL_REST: &str = "~";
pub const SHORT_REST: &str = "-";
pub const CHORD_SEPARATOR: &str = "/";

/// Upper bound on the whitespace emitted for a single rest or duration
pub const MAX_SPACING: usize = 4096;

const TRACK_SEPARATOR: &str = "\n\n";

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Onset in whole hundredths. Kept as a float so very late onsets never
/// saturate into one bucket.
fn onset_key(start_time: f64) -> f64 {
    round_half_up(start_time * ONSET_RESOLUTION)
}

/// Whitespace proportional to a length in beats, capped at [`MAX_SPACING`]
pub fn spacing(beats: f64) -> String {
    let count = round_half_up(beats * SPACES_PER_BEAT);
    if count > 0.0 {
        " ".repeat(count.min(MAX_SPACING as f64) as usize)
    } else {
        String::new()
    }
}

/// Rest marker for a silence of `gap` time units, followed by its spacing
pub fn rest_text(gap: f64) -> String {
    let beats = gap * BEATS_PER_TIME_UNIT;
    let symbol = if beats >= FULL_REST_THRESHOLD {
        FULL_REST
    } else {
        SHORT_REST
    };
    format!("{}{}", symbol, spacing(beats))
}

/// Notes sharing one rounded onset, rendered as a chord
#[derive(Debug, Clone, PartialEq)]
pub struct NoteGroup {
    key: f64,
    /// Sorted by ascending pitch, never empty
    pub notes: Vec<Note>,
}

impl NoteGroup {
    /// Rounded onset shared by every note in the group
    pub fn onset(&self) -> f64 {
        self.key / ONSET_RESOLUTION
    }

    /// Duration of the lowest note; chords are assumed to share one duration
    pub fn duration(&self) -> f64 {
        self.notes.first().map_or(0.0, |note| note.duration)
    }

    pub fn chord_text(&self) -> String {
        self.notes
            .iter()
            .map(|note| jianpu_symbol(note.pitch))
            .collect::<Vec<_>>()
            .join(CHORD_SEPARATOR)
    }
}

/// Bucket notes by rounded onset, returning groups in ascending time order.
///
/// The input slice is left untouched; grouping works on a sorted copy.
pub fn group_notes(notes: &[Note]) -> Vec<NoteGroup> {
    let mut ordered = notes.to_vec();
    ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    // Rounding is monotonic, so equal keys are adjacent in start-time order
    let mut groups: Vec<NoteGroup> = Vec::new();
    for note in ordered {
        let key = onset_key(note.start_time);
        match groups.last_mut() {
            Some(group) if group.key == key => group.notes.push(note),
            _ => groups.push(NoteGroup {
                key,
                notes: vec![note],
            }),
        }
    }

    for group in &mut groups {
        group.notes.sort_by_key(|note| note.pitch);
    }
    groups
}

/// Renders scores as Jianpu text
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationRenderer;

impl NotationRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render every non-empty track, in score order
    pub fn render(&self, score: &Score) -> String {
        score
            .tracks
            .iter()
            .filter_map(|track| self.render_track(track))
            .collect()
    }

    /// Render one track, or `None` if it has no notes
    pub fn render_track(&self, track: &Track) -> Option<String> {
        if track.is_empty() {
            return None;
        }

        let mut output = format!("Track: {}\n\n", track.display_name());
        let mut last_key: Option<f64> = None;

        for group in group_notes(&track.notes) {
            // The first group never gets a leading rest
            if let Some(last) = last_key {
                if group.key > last {
                    output.push_str(&rest_text((group.key - last) / ONSET_RESOLUTION));
                }
            }

            output.push_str(&group.chord_text());
            output.push_str(&spacing(group.duration() * BEATS_PER_TIME_UNIT));
            last_key = Some(group.key);
        }

        output.push_str(TRACK_SEPARATOR);
        Some(output)
    }

    /// Render the score and hand the complete text to `sink` exactly once
    pub fn render_to<S: OutputSink>(&self, score: &Score, sink: &mut S) -> Result<(), S::Error> {
        let text = self.render(score);
        sink.set_output(&text)
    }
}

/// Shorthand for `NotationRenderer::new().render(score)`
pub fn render(score: &Score) -> String {
    NotationRenderer::new().render(score)
}
