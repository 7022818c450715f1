//! Keymap presets and keyzone classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// A named note/velocity shape for a keyzone. Stored as `keymap_preset` 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeymapPreset {
    Major,
    Minor,
    Shared,
    Custom,
}

/// `(min_note, root_note, max_note)` of a named preset.
pub type NoteRange = (i32, i32, i32);

pub const MAJOR_RANGE: NoteRange = (0, 60, 71);
pub const MINOR_RANGE: NoteRange = (72, 84, 127);
pub const SHARED_RANGE: NoteRange = (0, 60, 127);

impl KeymapPreset {
    pub const ALL: [KeymapPreset; 4] = [
        KeymapPreset::Major,
        KeymapPreset::Minor,
        KeymapPreset::Shared,
        KeymapPreset::Custom,
    ];

    pub fn index(&self) -> i32 {
        match self {
            KeymapPreset::Major => 0,
            KeymapPreset::Minor => 1,
            KeymapPreset::Shared => 2,
            KeymapPreset::Custom => 3,
        }
    }

    /// Out-of-range indices read as `Custom`.
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => KeymapPreset::Major,
            1 => KeymapPreset::Minor,
            2 => KeymapPreset::Shared,
            _ => KeymapPreset::Custom,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KeymapPreset::Major => "Major",
            KeymapPreset::Minor => "Minor",
            KeymapPreset::Shared => "Shared",
            KeymapPreset::Custom => "Custom",
        }
    }

    pub fn note_range(&self) -> Option<NoteRange> {
        match self {
            KeymapPreset::Major => Some(MAJOR_RANGE),
            KeymapPreset::Minor => Some(MINOR_RANGE),
            KeymapPreset::Shared => Some(SHARED_RANGE),
            KeymapPreset::Custom => None,
        }
    }

    /// Classify a keyzone shape.
    ///
    /// Any velocity or offset that differs from the preset defaults makes the
    /// zone `Custom`; otherwise the note triple decides.
    pub fn classify(shape: &ZoneShape) -> Self {
        if shape.min_velocity != 0
            || shape.max_velocity != 127
            || shape.start_offset_frame != -1
            || shape.end_offset_frame != -1
        {
            return KeymapPreset::Custom;
        }
        let notes = (shape.min_note, shape.root_note, shape.max_note);
        [KeymapPreset::Major, KeymapPreset::Minor, KeymapPreset::Shared]
            .into_iter()
            .find(|p| p.note_range() == Some(notes))
            .unwrap_or(KeymapPreset::Custom)
    }
}

impl fmt::Display for KeymapPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// The fields classification looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneShape {
    pub min_note: i32,
    pub root_note: i32,
    pub max_note: i32,
    pub min_velocity: i32,
    pub max_velocity: i32,
    pub start_offset_frame: i32,
    pub end_offset_frame: i32,
}

impl ZoneShape {
    /// Read a shape without materializing fields; absent or non-int fields read as 0.
    pub fn read(zone: &Tree) -> Self {
        let int = |key: &str| {
            zone.find_child(key)
                .and_then(|n| n.value.as_int())
                .unwrap_or(0)
        };
        Self {
            min_note: int("min_note"),
            root_note: int("root_note"),
            max_note: int("max_note"),
            min_velocity: int("min_velocity"),
            max_velocity: int("max_velocity"),
            start_offset_frame: int("start_offset_frame"),
            end_offset_frame: int("end_offset_frame"),
        }
    }
}

impl Default for ZoneShape {
    /// The `Shared` shape.
    fn default() -> Self {
        Self {
            min_note: 0,
            root_note: 60,
            max_note: 127,
            min_velocity: 0,
            max_velocity: 127,
            start_offset_frame: -1,
            end_offset_frame: -1,
        }
    }
}
