//! Keyzone Module
//!
//! Typed views over keyzone trees:
//! - `Keyzone`: one note/velocity-range-to-sample mapping
//! - `Timestretch`: the `timestretch_settings` child of a keyzone
//! - `Keymap`: the ordered keyzone list of a fusion patch
//! - `KeymapPreset`: the Major/Minor/Shared/Custom shapes
//!
//! Every hand edit of a note, velocity or offset reverts the zone to
//! `Custom`. Applying a named preset rewrites the shape in one step.

mod keymap;
mod preset;

pub use keymap::{Keymap, NEW_ZONE_LABEL};
pub use preset::{KeymapPreset, NoteRange, ZoneShape, MAJOR_RANGE, MINOR_RANGE, SHARED_RANGE};

use log::debug;

use crate::audio;
use crate::tree::{Node, Tree};

pub const MIN_MIDI: i32 = 0;
pub const MAX_MIDI: i32 = 127;

/// Which note field of a keyzone to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Min,
    Max,
    Root,
}

impl NoteField {
    pub fn key(&self) -> &'static str {
        match self {
            NoteField::Min => "min_note",
            NoteField::Max => "max_note",
            NoteField::Root => "root_note",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityBound {
    Min,
    Max,
}

impl VelocityBound {
    pub fn key(&self) -> &'static str {
        match self {
            VelocityBound::Min => "min_velocity",
            VelocityBound::Max => "max_velocity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetBound {
    Start,
    End,
}

impl OffsetBound {
    pub fn key(&self) -> &'static str {
        match self {
            OffsetBound::Start => "start_offset_frame",
            OffsetBound::End => "end_offset_frame",
        }
    }
}

/// Percent shown for a stored 0..=127 velocity.
pub fn velocity_to_percent(velocity: i32) -> i32 {
    (f64::from(velocity) / 1.27).trunc() as i32
}

/// Stored velocity for a percent input. Input is clamped to 0..=100.
pub fn percent_to_velocity(percent: i32) -> i32 {
    (f64::from(percent.clamp(0, 100)) * 1.27).ceil() as i32
}

/// Mutable view of one keyzone tree.
///
/// Accessors follow the tree's materializing contract: a field that is
/// missing is created with its zero value on first access.
pub struct Keyzone<'a> {
    zone: &'a mut Tree,
}

impl<'a> Keyzone<'a> {
    pub fn new(zone: &'a mut Tree) -> Self {
        Self { zone }
    }

    pub fn tree(&self) -> &Tree {
        &*self.zone
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut *self.zone
    }

    pub fn label(&mut self) -> &str {
        self.zone.get_string("zone_label")
    }

    pub fn set_label(&mut self, label: &str) {
        *self.zone.get_string("zone_label") = label.to_string();
    }

    /// The stored preset selection.
    pub fn preset(&mut self) -> KeymapPreset {
        KeymapPreset::from_index(*self.zone.get_int("keymap_preset"))
    }

    /// Classification of the current shape, independent of the stored selection.
    pub fn classify(&self) -> KeymapPreset {
        KeymapPreset::classify(&ZoneShape::read(&*self.zone))
    }

    pub fn shape(&self) -> ZoneShape {
        ZoneShape::read(&*self.zone)
    }

    /// Select a preset. Named presets rewrite notes, velocities and offsets;
    /// `Custom` only records the selection.
    pub fn select_preset(&mut self, preset: KeymapPreset) {
        *self.zone.get_int("keymap_preset") = preset.index();
        let Some((min, root, max)) = preset.note_range() else {
            return;
        };
        *self.zone.get_int("min_note") = min;
        *self.zone.get_int("max_note") = max;
        *self.zone.get_int("root_note") = root;
        *self.zone.get_int("min_velocity") = MIN_MIDI;
        *self.zone.get_int("max_velocity") = MAX_MIDI;
        *self.zone.get_int("start_offset_frame") = -1;
        *self.zone.get_int("end_offset_frame") = -1;
        debug!("Applied keymap preset {preset}");
    }

    fn mark_custom(&mut self) {
        *self.zone.get_int("keymap_preset") = KeymapPreset::Custom.index();
    }

    pub fn note(&mut self, field: NoteField) -> i32 {
        *self.zone.get_int(field.key())
    }

    /// Set one note, clamped to the MIDI range. `linked` writes all three.
    pub fn set_note(&mut self, field: NoteField, value: i32, linked: bool) {
        self.mark_custom();
        let value = value.clamp(MIN_MIDI, MAX_MIDI);
        if linked {
            for f in [NoteField::Min, NoteField::Max, NoteField::Root] {
                *self.zone.get_int(f.key()) = value;
            }
        } else {
            *self.zone.get_int(field.key()) = value;
        }
    }

    pub fn velocity(&mut self, bound: VelocityBound) -> i32 {
        *self.zone.get_int(bound.key())
    }

    /// Velocity as shown to the user: raw 0..=127 or percent.
    pub fn velocity_display(&mut self, bound: VelocityBound, percent: bool) -> i32 {
        let v = self.velocity(bound);
        if percent {
            velocity_to_percent(v)
        } else {
            v
        }
    }

    pub fn set_velocity(&mut self, bound: VelocityBound, input: i32, percent: bool) {
        self.mark_custom();
        let stored = if percent {
            percent_to_velocity(input)
        } else {
            input.clamp(MIN_MIDI, MAX_MIDI)
        };
        *self.zone.get_int(bound.key()) = stored;
    }

    pub fn offset(&mut self, bound: OffsetBound) -> i32 {
        *self.zone.get_int(bound.key())
    }

    /// Set a sample offset in frames; `-1` means unset.
    pub fn set_offset(&mut self, bound: OffsetBound, frames: i32) {
        self.mark_custom();
        *self.zone.get_int(bound.key()) = frames.max(-1);
    }

    fn flag(&mut self, key: &str) -> bool {
        *self.zone.get_int(key) == 1
    }

    fn set_flag(&mut self, key: &str, on: bool) {
        *self.zone.get_int(key) = i32::from(on);
    }

    pub fn unpitched(&mut self) -> bool {
        self.flag("unpitched")
    }

    pub fn set_unpitched(&mut self, on: bool) {
        self.set_flag("unpitched", on);
    }

    pub fn singleton(&mut self) -> bool {
        self.flag("singleton")
    }

    pub fn set_singleton(&mut self, on: bool) {
        self.set_flag("singleton", on);
    }

    pub fn velocity_to_volume(&mut self) -> bool {
        self.flag("velocity_to_volume")
    }

    pub fn set_velocity_to_volume(&mut self, on: bool) {
        self.set_flag("velocity_to_volume", on);
    }

    pub fn volume(&mut self) -> f32 {
        *self.zone.get_float("volume")
    }

    pub fn set_volume(&mut self, volume: f32) {
        *self.zone.get_float("volume") = volume;
    }

    /// Stereo position, clamped to [-1, 1]. The stored value is left as is.
    pub fn pan(&mut self) -> f32 {
        self.zone.get_node("pan").get_float("position").clamp(-1.0, 1.0)
    }

    pub fn set_pan(&mut self, pan: f32) {
        *self.zone.get_node("pan").get_float("position") = pan.clamp(-1.0, 1.0);
    }

    pub fn sample_path(&mut self) -> &str {
        self.zone.get_string("sample_path")
    }

    pub fn set_sample_path(&mut self, file_name: &str) {
        *self.zone.get_string("sample_path") = file_name.to_string();
    }

    /// Point the zone at a sample by logical name.
    pub fn set_sample(&mut self, logical: &str) {
        self.set_sample_path(&audio::sample_file_name(logical));
    }

    /// Index of the referenced sample in `logical_names`, 0 when unmatched.
    pub fn sample_index(&mut self, logical_names: &[&str]) -> usize {
        let current = audio::logical_name(self.sample_path()).to_string();
        logical_names
            .iter()
            .position(|n| *n == current)
            .unwrap_or(0)
    }

    pub fn timestretch(&mut self) -> Timestretch<'_> {
        Timestretch::new(self.zone.get_node("timestretch_settings"))
    }
}

/// View of a keyzone's `timestretch_settings`.
pub struct Timestretch<'a> {
    settings: &'a mut Tree,
}

impl<'a> Timestretch<'a> {
    pub fn new(settings: &'a mut Tree) -> Self {
        Self { settings }
    }

    fn flag(&mut self, key: &str) -> bool {
        *self.settings.get_int(key) == 1
    }

    fn set_flag(&mut self, key: &str, on: bool) {
        *self.settings.get_int(key) = i32::from(on);
    }

    pub fn maintain_time(&mut self) -> bool {
        self.flag("maintain_time")
    }

    pub fn set_maintain_time(&mut self, on: bool) {
        self.set_flag("maintain_time", on);
    }

    pub fn sync_tempo(&mut self) -> bool {
        self.flag("sync_tempo")
    }

    pub fn set_sync_tempo(&mut self, on: bool) {
        self.set_flag("sync_tempo", on);
    }

    /// "Natural pitching".
    pub fn maintain_formant(&mut self) -> bool {
        self.flag("maintain_formant")
    }

    pub fn set_maintain_formant(&mut self, on: bool) {
        self.set_flag("maintain_formant", on);
    }

    /// Whether `orig_tempo` follows the song tempo. Legacy settings without
    /// the field get it inserted first, enabled.
    pub fn orig_tempo_sync(&mut self) -> bool {
        self.ensure_orig_tempo_sync();
        self.flag("orig_tempo_sync")
    }

    pub fn set_orig_tempo_sync(&mut self, on: bool) {
        self.ensure_orig_tempo_sync();
        self.set_flag("orig_tempo_sync", on);
    }

    /// Returns true when the field had to be inserted.
    pub fn ensure_orig_tempo_sync(&mut self) -> bool {
        if self.settings.contains_key("orig_tempo_sync") {
            return false;
        }
        self.settings.insert_front(Node::new("orig_tempo_sync", 1));
        true
    }

    pub fn orig_tempo(&mut self) -> i32 {
        *self.settings.get_int("orig_tempo")
    }

    pub fn set_orig_tempo(&mut self, bpm: i32) {
        *self.settings.get_int("orig_tempo") = bpm.max(0);
    }
}
