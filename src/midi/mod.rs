//! MIDI Resource Module
//!
//! The parts of a MIDI file resource the editor touches: loop bounds, the
//! `samplemidi` track's loop markers and the chord timeline.
//!
//! - `loop_length`: the cel's loop length and its canonical values
//! - `loop_sync`: pushing a loop length into the major/minor resources

mod loop_length;
mod loop_sync;

pub use loop_length::{LoopLength, CANONICAL_LENGTHS, DEFAULT_LOOP_TICKS};
pub use loop_sync::{sync_loop_length, LoopSyncReport, TrackSyncStatus};

use serde::{Deserialize, Serialize};

use crate::chords::ChordTimeline;

/// Name of the track that carries the sample trigger and loop markers.
pub const SAMPLE_TRACK: &str = "samplemidi";

/// Event type code of a loop-boundary marker.
pub const LOOP_MARKER_CODE: u8 = 1;

pub const NOTE_ON_CODE: u8 = 0x90;
pub const NOTE_OFF_CODE: u8 = 0x80;

/// Event type, stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MidiEventKind {
    LoopMarker,
    Other(u8),
}

impl From<u8> for MidiEventKind {
    fn from(code: u8) -> Self {
        if code == LOOP_MARKER_CODE {
            MidiEventKind::LoopMarker
        } else {
            MidiEventKind::Other(code)
        }
    }
}

impl From<MidiEventKind> for u8 {
    fn from(kind: MidiEventKind) -> Self {
        match kind {
            MidiEventKind::LoopMarker => LOOP_MARKER_CODE,
            MidiEventKind::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiEvent {
    pub tick: i32,
    #[serde(rename = "event_type")]
    pub kind: MidiEventKind,
}

impl MidiEvent {
    pub fn new(tick: i32, kind: MidiEventKind) -> Self {
        Self { tick, kind }
    }

    pub fn is_loop_marker(&self) -> bool {
        self.kind == MidiEventKind::LoopMarker
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiTrack {
    pub name: String,
    #[serde(default)]
    pub events: Vec<MidiEvent>,
}

impl MidiTrack {
    pub fn new(name: &str, events: Vec<MidiEvent>) -> Self {
        Self {
            name: name.to_string(),
            events,
        }
    }

    pub fn loop_markers(&self) -> impl Iterator<Item = &MidiEvent> {
        self.events.iter().filter(|e| e.is_loop_marker())
    }
}

/// A decoded MIDI resource of one cel mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiFileResource {
    pub final_tick: i32,
    pub final_tick_minus_one: i32,
    pub last_track_final_tick: i32,
    #[serde(default)]
    pub tracks: Vec<MidiTrack>,
    #[serde(default)]
    pub chords: ChordTimeline,
    #[serde(default)]
    pub minor: bool,
}

impl MidiFileResource {
    /// The one-note layout of a freshly created cel: a single `samplemidi`
    /// track that triggers the sample at tick 0 and loops at `length`.
    pub fn single_note(length: i32, minor: bool) -> Self {
        let end_marker = if minor { length - 1 } else { length };
        let track = MidiTrack::new(
            SAMPLE_TRACK,
            vec![
                MidiEvent::new(0, MidiEventKind::LoopMarker),
                MidiEvent::new(0, MidiEventKind::Other(NOTE_ON_CODE)),
                MidiEvent::new(length - 1, MidiEventKind::Other(NOTE_OFF_CODE)),
                MidiEvent::new(end_marker, MidiEventKind::LoopMarker),
            ],
        );
        Self {
            final_tick: length,
            final_tick_minus_one: length - 1,
            last_track_final_tick: length,
            tracks: vec![track],
            chords: ChordTimeline::default(),
            minor,
        }
    }

    /// True when exactly one track is named `samplemidi`, the only layout
    /// whose loop length can be rewritten automatically.
    pub fn is_single_note(&self) -> bool {
        self.tracks.iter().filter(|t| t.name == SAMPLE_TRACK).count() == 1
    }

    pub fn sample_track(&self) -> Option<&MidiTrack> {
        self.tracks.iter().find(|t| t.name == SAMPLE_TRACK)
    }

    pub fn sample_track_mut(&mut self) -> Option<&mut MidiTrack> {
        self.tracks.iter_mut().find(|t| t.name == SAMPLE_TRACK)
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
