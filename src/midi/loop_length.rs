//! Loop length of a cel, in MIDI ticks.

use serde::{Deserialize, Serialize};

use crate::error::{CelError, Result};
use crate::time::TICKS_PER_BEAT;

/// 8, 16, 32 and 64 bars of 4/4.
pub const CANONICAL_LENGTHS: [i32; 4] = [15360, 30720, 61440, 122880];

/// 32 bars.
pub const DEFAULT_LOOP_TICKS: i32 = 61440;

const DEFAULT_INDEX: usize = 2;

/// Loop length plus the editor state used to pick it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopLength {
    pub ticks: i32,
    /// Index into [`CANONICAL_LENGTHS`] when `ticks` is canonical.
    pub selected: Option<usize>,
    /// Free tick entry instead of the bar presets.
    pub advanced: bool,
}

impl Default for LoopLength {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_LOOP_TICKS,
            selected: Some(DEFAULT_INDEX),
            advanced: false,
        }
    }
}

impl LoopLength {
    pub fn from_ticks(ticks: i32) -> Self {
        let selected = canonical_index(ticks);
        Self {
            ticks,
            selected,
            advanced: selected.is_none(),
        }
    }

    pub fn select_canonical(&mut self, index: usize) -> Result<()> {
        let ticks = *CANONICAL_LENGTHS
            .get(index)
            .ok_or(CelError::IndexOutOfRange {
                what: "loop length",
                index,
                len: CANONICAL_LENGTHS.len(),
            })?;
        self.ticks = ticks;
        self.selected = Some(index);
        self.advanced = false;
        Ok(())
    }

    /// Free entry, for lengths that are not a bar preset.
    pub fn set_advanced_ticks(&mut self, ticks: i32) {
        self.ticks = ticks;
        self.selected = canonical_index(ticks);
        self.advanced = true;
    }

    /// Keep a canonical length, otherwise fall back to 32 bars.
    pub fn snap_to_canonical(&mut self) {
        match canonical_index(self.ticks) {
            Some(index) => self.selected = Some(index),
            None => {
                self.ticks = DEFAULT_LOOP_TICKS;
                self.selected = Some(DEFAULT_INDEX);
            }
        }
        self.advanced = false;
    }

    pub fn bars(&self) -> f32 {
        self.ticks as f32 / (TICKS_PER_BEAT * 4) as f32
    }
}

fn canonical_index(ticks: i32) -> Option<usize> {
    CANONICAL_LENGTHS.iter().position(|&t| t == ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(15360 => (15360, Some(0)) ; "eight bars")]
    #[test_case(122880 => (122880, Some(3)) ; "sixty four bars")]
    #[test_case(61439 => (61440, Some(2)) ; "off by one")]
    #[test_case(0 => (61440, Some(2)) ; "zero")]
    fn test_snap(ticks: i32) -> (i32, Option<usize>) {
        let mut length = LoopLength::from_ticks(ticks);
        length.snap_to_canonical();
        assert!(!length.advanced);
        (length.ticks, length.selected)
    }

    #[test]
    fn test_select_and_advanced_entry() {
        let mut length = LoopLength::default();
        length.select_canonical(1).unwrap();
        assert_eq!(length.ticks, 30720);
        assert_eq!(length.bars(), 16.0);
        assert!(length.select_canonical(4).is_err());

        length.set_advanced_ticks(1000);
        assert!(length.advanced);
        assert_eq!(length.selected, None);
    }
}
