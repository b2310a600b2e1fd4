use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use jianpu_core::{Note, Score, Track};
use log::debug;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use thiserror::Error;

/// 120 BPM, in microseconds per quarter note
const DEFAULT_TEMPO: u32 = 500_000;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read MIDI file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse MIDI file: {0}")]
    Parse(#[from] midly::Error),
}

/// Converts ticks to seconds for one file
#[derive(Debug, Clone, PartialEq)]
enum Clock {
    /// Tempo changes as (tick, microseconds per quarter), strictly ascending, starting at tick 0
    Metrical {
        ticks_per_beat: f64,
        tempo_map: Vec<(u64, u32)>,
    },
    Timecode {
        seconds_per_tick: f64,
    },
}

impl Clock {
    fn from_smf(smf: &Smf) -> Self {
        match smf.header.timing {
            Timing::Metrical(tpb) => Clock::Metrical {
                ticks_per_beat: f64::from(tpb.as_int().max(1)),
                tempo_map: Self::collect_tempo_map(smf),
            },
            Timing::Timecode(fps, subframe) => Clock::Timecode {
                seconds_per_tick: 1.0 / (f64::from(fps.as_f32()) * f64::from(subframe.max(1))),
            },
        }
    }

    /// Tempo events from every track, merged onto one timeline.
    /// When two changes share a tick, the later one in file order wins.
    fn collect_tempo_map(smf: &Smf) -> Vec<(u64, u32)> {
        let mut changes = Vec::new();
        for track in &smf.tracks {
            let mut tick: u64 = 0;
            for event in track {
                tick += u64::from(event.delta.as_int());
                if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                    changes.push((tick, tempo.as_int()));
                }
            }
        }
        changes.sort_by_key(|&(tick, _)| tick);

        let mut tempo_map = vec![(0, DEFAULT_TEMPO)];
        for (tick, tempo) in changes {
            match tempo_map.last_mut() {
                Some(last) if last.0 == tick => last.1 = tempo,
                _ => tempo_map.push((tick, tempo)),
            }
        }
        tempo_map
    }

    fn seconds(&self, tick: u64) -> f64 {
        match self {
            Clock::Timecode { seconds_per_tick } => tick as f64 * *seconds_per_tick,
            Clock::Metrical {
                ticks_per_beat,
                tempo_map,
            } => {
                let mut seconds = 0.0;
                for (idx, &(start, tempo)) in tempo_map.iter().enumerate() {
                    if tick <= start {
                        break;
                    }
                    let end = tempo_map
                        .get(idx + 1)
                        .map_or(tick, |&(next, _)| next.min(tick));
                    seconds += (end - start) as f64 * f64::from(tempo)
                        / (1_000_000.0 * *ticks_per_beat);
                }
                seconds
            }
        }
    }
}

/// Decode a Standard MIDI File into a score, one track per MIDI track.
///
/// Times are in seconds. Tracks without notes (such as a conductor track)
/// are kept; the renderer skips them.
pub fn decode(bytes: &[u8]) -> Result<Score, DecodeError> {
    let smf = Smf::parse(bytes)?;
    let clock = Clock::from_smf(&smf);

    let tracks: Vec<Track> = smf
        .tracks
        .iter()
        .map(|events| decode_track(events, &clock))
        .collect();

    for (idx, track) in tracks.iter().enumerate() {
        debug!(
            "Track {} ({}): {} notes",
            idx,
            track.display_name(),
            track.notes.len()
        );
    }

    Ok(Score::new(tracks))
}

pub fn decode_file(path: &Path) -> Result<Score, DecodeError> {
    let data = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&data)
}

fn decode_track(events: &[TrackEvent], clock: &Clock) -> Track {
    let mut tick: u64 = 0;
    let mut name: Option<String> = None;
    // Start ticks of sounding notes per (channel, key), oldest first
    let mut sounding: HashMap<(u8, u8), VecDeque<u64>> = HashMap::new();
    let mut spans: Vec<(u64, u64, u8)> = Vec::new();

    for event in events {
        tick += u64::from(event.delta.as_int());

        match event.kind {
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        sounding
                            .entry((channel, key.as_int()))
                            .or_default()
                            .push_back(tick);
                    }
                    // NoteOn with velocity 0 is a note off
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let key = key.as_int();
                        if let Some(start) = sounding
                            .get_mut(&(channel, key))
                            .and_then(VecDeque::pop_front)
                        {
                            spans.push((start, tick, key));
                        }
                    }
                    _ => {}
                }
            }
            TrackEventKind::Meta(MetaMessage::TrackName(raw)) if name.is_none() => {
                name = clean_track_name(raw);
            }
            _ => {}
        }
    }

    // Notes never released end with the track
    for ((_, key), starts) in sounding {
        spans.extend(starts.into_iter().map(|start| (start, tick, key)));
    }

    let mut notes: Vec<Note> = spans
        .into_iter()
        .map(|(start, end, key)| {
            let start_time = clock.seconds(start);
            Note::new(start_time, clock.seconds(end) - start_time, i32::from(key))
        })
        .collect();
    notes.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then(a.pitch.cmp(&b.pitch))
    });

    Track::new(name, notes)
}

fn clean_track_name(raw: &[u8]) -> Option<String> {
    let name = String::from_utf8_lossy(raw);
    let cleaned = name.trim_end_matches('\0').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
