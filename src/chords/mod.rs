//! Chord Module
//!
//! Chord events of a MIDI resource and the editor operations on them.
//!
//! - `timeline`: the sorted, one-event-per-tick chord list
//! - `mode`: major/minor conversion of chord names
//! - `palette`: the chord pickers shown to the user
//! - `clipboard`: copy in one mode, paste in either

mod clipboard;
mod mode;
mod palette;
mod timeline;

pub use clipboard::ChordClipboard;
pub use mode::{convert_mode, convert_name, ChordMode, ConversionStyle, MAJOR_CHORDS, MINOR_CHORDS};
pub use palette::{chord_palette, palette_index, PaletteItem};
pub use timeline::ChordTimeline;

use serde::{Deserialize, Serialize};

/// One chord change. `start` and `end` are in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordEvent {
    pub start: i32,
    pub end: i32,
    pub name: String,
}

impl ChordEvent {
    pub fn new(start: i32, end: i32, name: &str) -> Self {
        Self {
            start,
            end,
            name: name.to_string(),
        }
    }
}
