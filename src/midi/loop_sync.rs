//! Loop length propagation into the major and minor MIDI resources.
//!
//! The minor resource's closing marker sits one tick earlier than the
//! major one's. That offset is part of the package format and is kept.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::chords::ChordMode;

use super::MidiFileResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSyncStatus {
    Updated,
    /// The resource does not have the single-note layout; left untouched.
    NotAutoUpdatable,
}

/// Per-resource outcome of [`sync_loop_length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopSyncReport {
    pub length: i32,
    pub major: TrackSyncStatus,
    pub minor: TrackSyncStatus,
}

impl LoopSyncReport {
    pub fn all_updated(&self) -> bool {
        self.major == TrackSyncStatus::Updated && self.minor == TrackSyncStatus::Updated
    }

    /// User-facing lines for every resource that was not updated.
    pub fn messages(&self) -> Vec<String> {
        [(ChordMode::Major, self.major), (ChordMode::Minor, self.minor)]
            .into_iter()
            .filter(|(_, status)| *status == TrackSyncStatus::NotAutoUpdatable)
            .map(|(mode, _)| format!("{mode} MIDI length cannot be automatically updated"))
            .collect()
    }
}

impl fmt::Display for LoopSyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.messages();
        if messages.is_empty() {
            write!(f, "Both MIDI resources set to {} ticks", self.length)
        } else {
            write!(f, "{}", messages.join("\n"))
        }
    }
}

/// Set the loop length of both resources.
///
/// For each single-note resource the final ticks become `length` and the
/// second loop marker of the `samplemidi` track moves to `length` (major) or
/// `length - 1` (minor). Other resources are reported, not changed.
pub fn sync_loop_length(
    major: &mut MidiFileResource,
    minor: &mut MidiFileResource,
    length: i32,
) -> LoopSyncReport {
    let report = LoopSyncReport {
        length,
        major: sync_one(major, length, ChordMode::Major),
        minor: sync_one(minor, length, ChordMode::Minor),
    };
    info!("Loop length sync to {length} ticks: {:?}/{:?}", report.major, report.minor);
    report
}

fn sync_one(midi: &mut MidiFileResource, length: i32, mode: ChordMode) -> TrackSyncStatus {
    if !midi.is_single_note() {
        warn!("{mode} MIDI length cannot be automatically updated");
        return TrackSyncStatus::NotAutoUpdatable;
    }
    midi.final_tick = length;
    midi.final_tick_minus_one = length - 1;
    midi.last_track_final_tick = length;

    let marker_tick = match mode {
        ChordMode::Major => length,
        ChordMode::Minor => length - 1,
    };
    let end_marker = midi
        .sample_track_mut()
        .and_then(|track| track.events.iter_mut().filter(|e| e.is_loop_marker()).nth(1));
    match end_marker {
        Some(event) => event.tick = marker_tick,
        None => debug!("{mode} samplemidi track has no closing loop marker"),
    }
    TrackSyncStatus::Updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{MidiEvent, MidiEventKind, MidiTrack};

    fn end_marker(midi: &MidiFileResource) -> i32 {
        midi.sample_track()
            .unwrap()
            .loop_markers()
            .nth(1)
            .unwrap()
            .tick
    }

    #[test]
    fn test_sync_keeps_minor_offset() {
        let mut major = MidiFileResource::single_note(15360, false);
        let mut minor = MidiFileResource::single_note(15360, true);
        let report = sync_loop_length(&mut major, &mut minor, 61440);

        assert!(report.all_updated());
        for midi in [&major, &minor] {
            assert_eq!(midi.final_tick, 61440);
            assert_eq!(midi.final_tick_minus_one, 61439);
            assert_eq!(midi.last_track_final_tick, 61440);
        }
        assert_eq!(end_marker(&major), 61440);
        assert_eq!(end_marker(&minor), 61439);
        // the opening marker never moves
        assert_eq!(major.sample_track().unwrap().events[0].tick, 0);
    }

    #[test]
    fn test_only_the_second_marker_moves() {
        let mut major = MidiFileResource::single_note(960, false);
        major.tracks[0]
            .events
            .push(MidiEvent::new(2000, MidiEventKind::LoopMarker));
        let mut minor = MidiFileResource::single_note(960, true);
        sync_loop_length(&mut major, &mut minor, 30720);
        let markers: Vec<i32> = major.tracks[0].loop_markers().map(|e| e.tick).collect();
        assert_eq!(markers, vec![0, 30720, 2000]);
    }

    #[test]
    fn test_structural_mismatch_is_reported() {
        let mut major = MidiFileResource::single_note(15360, false);
        let mut minor = MidiFileResource::single_note(15360, true);
        minor.tracks.push(MidiTrack::new("drums", Vec::new()));
        minor.tracks[0].name = "lead".to_string();
        let untouched = minor.clone();

        let report = sync_loop_length(&mut major, &mut minor, 30720);
        assert_eq!(report.major, TrackSyncStatus::Updated);
        assert_eq!(report.minor, TrackSyncStatus::NotAutoUpdatable);
        assert_eq!(minor, untouched);
        assert_eq!(
            report.messages(),
            vec!["Minor MIDI length cannot be automatically updated".to_string()]
        );
    }
}
