//! Pickup beats of a cel.
//!
//! Pickups mark where a cel may enter. They live in the cel's asset as a
//! plain float list and are edited like chords: sorted, one per value.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CelError, Result};
use crate::time::round_beat;

/// Highest beat a pickup may sit on.
pub const MAX_PICKUP_BEAT: f32 = 128.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pickups {
    beats: Vec<f32>,
}

impl Pickups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize loaded beats: clamped, rounded, sorted, de-duplicated.
    pub fn from_beats(beats: impl IntoIterator<Item = f32>) -> Self {
        let mut beats: Vec<f32> = beats.into_iter().map(normalize).collect();
        beats.sort_by(f32::total_cmp);
        beats.dedup();
        Self { beats }
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.beats.get(index).copied()
    }

    pub fn beats(&self) -> &[f32] {
        &self.beats
    }

    fn position(&self, beat: f32) -> Option<usize> {
        self.beats.iter().position(|&b| b == beat)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.beats.len() {
            Ok(())
        } else {
            Err(CelError::IndexOutOfRange {
                what: "pickup",
                index,
                len: self.beats.len(),
            })
        }
    }

    /// Add a pickup. Returns its index, or `None` if the beat already has one.
    pub fn add(&mut self, beat: f32) -> Option<usize> {
        let beat = normalize(beat);
        if self.position(beat).is_some() {
            return None;
        }
        let index = self.beats.partition_point(|&b| b < beat);
        self.beats.insert(index, beat);
        debug!("Added pickup at beat {beat}");
        Some(index)
    }

    /// Move a pickup. A lone pickup always moves; otherwise an occupied
    /// target beat skips the edit.
    pub fn update(&mut self, index: usize, beat: f32) -> Result<Option<usize>> {
        self.check_index(index)?;
        let beat = normalize(beat);
        if self.beats.len() == 1 {
            self.beats[0] = beat;
            return Ok(Some(0));
        }
        if self.position(beat).is_some() {
            return Ok(None);
        }
        self.beats[index] = beat;
        self.beats.sort_by(f32::total_cmp);
        Ok(self.position(beat))
    }

    /// Remove a pickup; the returned selection follows the chord timeline's.
    pub fn remove(&mut self, index: usize) -> Result<Option<usize>> {
        self.check_index(index)?;
        self.beats.remove(index);
        if self.beats.is_empty() {
            Ok(None)
        } else {
            Ok(Some(index.min(self.beats.len() - 1)))
        }
    }

    pub fn clear(&mut self) {
        self.beats.clear();
    }
}

fn normalize(beat: f32) -> f32 {
    round_beat(beat, MAX_PICKUP_BEAT)
}
