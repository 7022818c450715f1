use log::debug;

use super::{convert_mode, ChordMode, ChordTimeline, ConversionStyle};

/// Copied chords, held in the mode they were copied from and already
/// converted to the opposite one.
#[derive(Debug, Clone, Default)]
pub struct ChordClipboard {
    copied: Option<Copied>,
}

#[derive(Debug, Clone)]
struct Copied {
    mode: ChordMode,
    same_mode: ChordTimeline,
    opposite_mode: ChordTimeline,
}

impl ChordClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, timeline: &ChordTimeline, mode: ChordMode, style: ConversionStyle) {
        self.copied = Some(Copied {
            mode,
            same_mode: timeline.clone(),
            opposite_mode: convert_mode(timeline, mode.opposite(), style),
        });
        debug!("Copied {} {mode} chord(s)", timeline.len());
    }

    /// True when there is something worth pasting.
    pub fn has_chords(&self) -> bool {
        self.copied.as_ref().is_some_and(|c| !c.same_mode.is_empty())
    }

    /// The copied chords as they should appear on a `target` tab.
    pub fn paste(&self, target: ChordMode) -> Option<ChordTimeline> {
        let copied = self.copied.as_ref().filter(|c| !c.same_mode.is_empty())?;
        if copied.mode == target {
            Some(copied.same_mode.clone())
        } else {
            Some(copied.opposite_mode.clone())
        }
    }
}
