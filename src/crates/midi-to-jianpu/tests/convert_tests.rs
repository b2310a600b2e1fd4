use std::fs;
use std::io;
use std::path::PathBuf;

use jianpu_core::OutputSink;
use midi_to_jianpu::{convert_bytes, convert_file, ConvertError, FileSink, InputFormat};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

fn event(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind,
    }
}

fn note(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
    event(
        delta,
        TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(vel),
            },
        },
    )
}

fn end_of_track() -> TrackEvent<'static> {
    event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack))
}

/// Conductor track at 120 BPM plus a "Piano" track: C/E chord, a beat of
/// silence, then G. Each note lasts one quarter (0.5 s).
fn piano_smf() -> Vec<u8> {
    let mut smf = Smf::new(Header::new(Format::Parallel, Timing::Metrical(u15::new(480))));
    smf.tracks.push(vec![
        event(0, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))),
        end_of_track(),
    ]);
    smf.tracks.push(vec![
        event(0, TrackEventKind::Meta(MetaMessage::TrackName(b"Piano"))),
        note(0, 60, 90),
        note(0, 64, 90),
        note(480, 60, 0),
        note(0, 64, 0),
        note(480, 67, 90),
        note(480, 67, 0),
        end_of_track(),
    ]);

    let mut buf = Vec::new();
    smf.write(&mut buf).unwrap();
    buf
}

/// Records every hand-off so tests can count them
#[derive(Default)]
struct RecordingSink {
    writes: Vec<String>,
}

impl OutputSink for RecordingSink {
    type Error = io::Error;

    fn set_output(&mut self, text: &str) -> Result<(), io::Error> {
        self.writes.push(text.to_string());
        Ok(())
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("midi-to-jianpu-{}-{}", std::process::id(), name))
}

#[test]
fn test_midi_to_jianpu() {
    let mut sink = RecordingSink::default();
    let summary = convert_bytes(&piano_smf(), InputFormat::Midi, &mut sink).unwrap();

    // Onsets 0.0 and 1.0: chord with 4 spaces, full rest of 4 beats, then G
    let expected = format!("Track: Piano\n\n1/3{}~{}5{}\n\n", " ".repeat(4), " ".repeat(8), " ".repeat(4));
    assert_eq!(sink.writes, vec![expected]);
    assert_eq!(summary.tracks_rendered, 1);
    assert_eq!(summary.notes, 3);
}

#[test]
fn test_decode_failure_leaves_sink_untouched() {
    let mut sink = RecordingSink::default();
    let result = convert_bytes(b"RIFF....not a midi file", InputFormat::Midi, &mut sink);

    assert!(matches!(result, Err(ConvertError::Decode(_))));
    assert!(sink.writes.is_empty());
}

#[test]
fn test_json_score_file_to_output_file() {
    let input = temp_path("score.json");
    let output = temp_path("score.jianpu.txt");
    fs::write(
        &input,
        r#"{"tracks": [
            {"name": "", "notes": [
                {"startTime": 2, "duration": 1, "pitchNumber": 62},
                {"startTime": 0, "duration": 1, "pitchNumber": 60}
            ]}
        ]}"#,
    )
    .unwrap();
    fs::write(&output, "previous conversion").unwrap();

    let mut sink = FileSink::new(&output);
    convert_file(&input, InputFormat::Json, &mut sink).unwrap();

    let expected = format!(
        "Track: Untitled\n\n1{}~{}2{}\n\n",
        " ".repeat(8),
        " ".repeat(16),
        " ".repeat(8)
    );
    assert_eq!(fs::read_to_string(&output).unwrap(), expected);

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}

#[test]
fn test_failed_file_conversion_keeps_previous_output() {
    let input = temp_path("broken.mid");
    let output = temp_path("broken.jianpu.txt");
    fs::write(&input, b"MThd garbage").unwrap();
    fs::write(&output, "previous conversion").unwrap();

    let mut sink = FileSink::new(&output);
    assert!(convert_file(&input, InputFormat::Midi, &mut sink).is_err());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous conversion");

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}
