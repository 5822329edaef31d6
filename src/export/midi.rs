// MIDI output for evolved melodies.
//
// Converts an individual into a single-track Standard MIDI File: for each
// note, a note-on at delta 0 followed by a note-off after the note's
// duration in ticks. Pure I/O; runs only after the evolution loop has
// produced fully-evaluated individuals.

use crate::engines::generation::individual::Individual;
use crate::error::{EvotuneError, Result};
use midly::{
    num::{u15, u28, u4, u7},
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Write an individual to a MIDI file. Refuses individuals with a stale
/// fitness cache: the exporter only ever sees fully-evaluated melodies.
pub fn write_midi(individual: &Individual, path: &Path) -> Result<()> {
    if !individual.fitness_valid() {
        return Err(EvotuneError::Export(
            "refusing to export an individual with invalid fitness".to_string(),
        ));
    }

    let smf = individual_to_smf(individual);
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| EvotuneError::Export(format!("MIDI encoding failed: {}", e)))?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert an individual to an in-memory SMF.
pub fn individual_to_smf(individual: &Individual) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(0);
    let mut track: Track<'static> = Vec::new();

    for note in individual.notes() {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(note.pitch),
                    vel: u7::new(note.velocity),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(note.duration),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(note.pitch),
                    vel: u7::new(note.velocity),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    smf
}
