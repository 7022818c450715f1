use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CelError, Result};

use super::ChordEvent;

/// Chord events sorted by `start`, at most one per tick.
///
/// Every mutation goes through this type, so the ordering holds between
/// calls. Edits that would put two events on one tick are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ChordEvent>", into = "Vec<ChordEvent>")]
pub struct ChordTimeline {
    events: Vec<ChordEvent>,
}

impl ChordTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary events: sorted, later duplicates of a tick dropped.
    pub fn from_events(mut events: Vec<ChordEvent>) -> Self {
        events.sort_by_key(|e| e.start);
        events.dedup_by_key(|e| e.start);
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChordEvent> {
        self.events.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChordEvent> {
        self.events.iter()
    }

    pub fn events(&self) -> &[ChordEvent] {
        &self.events
    }

    pub fn position(&self, start: i32) -> Option<usize> {
        self.events.iter().position(|e| e.start == start)
    }

    pub fn contains_start(&self, start: i32) -> bool {
        self.position(start).is_some()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.events.len() {
            Ok(())
        } else {
            Err(CelError::IndexOutOfRange {
                what: "chord",
                index,
                len: self.events.len(),
            })
        }
    }

    /// Insert a chord at `start`. Returns its index, or `None` when a chord
    /// already starts there.
    ///
    /// The first chord of an empty timeline lasts until `final_tick`; later
    /// ones end one tick after they start.
    pub fn add(&mut self, start: i32, default_name: &str, final_tick: i32) -> Option<usize> {
        if self.contains_start(start) {
            debug!("Chord at tick {start} already exists");
            return None;
        }
        let end = if self.events.is_empty() {
            final_tick
        } else {
            start + 1
        };
        let index = self.events.partition_point(|e| e.start < start);
        self.events.insert(index, ChordEvent::new(start, end, default_name));
        debug!("Added chord {default_name} at tick {start}");
        Some(index)
    }

    /// Move the chord at `index` to `new_start`.
    ///
    /// A lone chord always moves. Otherwise the move is skipped (`Ok(None)`)
    /// when any chord already sits on `new_start`.
    pub fn update_start(&mut self, index: usize, new_start: i32) -> Result<Option<usize>> {
        self.check_index(index)?;
        if self.events.len() == 1 {
            self.events[0].start = new_start;
            return Ok(Some(0));
        }
        if self.contains_start(new_start) {
            return Ok(None);
        }
        self.events[index].start = new_start;
        self.events.sort_by_key(|e| e.start);
        Ok(self.position(new_start))
    }

    /// Remove the chord at `index` and return the selection that follows:
    /// the same slot, the previous one when the last chord went, or `None`
    /// once the timeline is empty.
    pub fn remove(&mut self, index: usize) -> Result<Option<usize>> {
        self.check_index(index)?;
        let removed = self.events.remove(index);
        debug!("Removed chord {} at tick {}", removed.name, removed.start);
        if self.events.is_empty() {
            Ok(None)
        } else {
            Ok(Some(index.min(self.events.len() - 1)))
        }
    }

    pub fn set_name(&mut self, index: usize, name: &str) -> Result<()> {
        self.check_index(index)?;
        self.events[index].name = name.to_string();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub(super) fn events_mut(&mut self) -> &mut [ChordEvent] {
        &mut self.events
    }
}

impl From<Vec<ChordEvent>> for ChordTimeline {
    fn from(events: Vec<ChordEvent>) -> Self {
        Self::from_events(events)
    }
}

impl From<ChordTimeline> for Vec<ChordEvent> {
    fn from(timeline: ChordTimeline) -> Self {
        timeline.events
    }
}

impl<'a> IntoIterator for &'a ChordTimeline {
    type Item = &'a ChordEvent;
    type IntoIter = std::slice::Iter<'a, ChordEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(timeline: &ChordTimeline) -> Vec<i32> {
        timeline.iter().map(|e| e.start).collect()
    }

    #[test]
    fn test_first_chord_spans_loop() {
        let mut timeline = ChordTimeline::new();
        assert_eq!(timeline.add(960, "1", 61440), Some(0));
        assert_eq!(timeline.get(0), Some(&ChordEvent::new(960, 61440, "1")));

        assert_eq!(timeline.add(480, "1", 61440), Some(0));
        assert_eq!(timeline.get(0).unwrap().end, 481);
        assert_eq!(starts(&timeline), vec![480, 960]);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut timeline = ChordTimeline::new();
        timeline.add(0, "1m", 1920);
        let before = timeline.clone();
        assert_eq!(timeline.add(0, "4m", 1920), None);
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_update_start_reorders_and_tracks_selection() {
        let mut timeline = ChordTimeline::new();
        for start in [0, 480, 960] {
            timeline.add(start, "1", 1920);
        }
        timeline.set_name(0, "4").unwrap();

        assert_eq!(timeline.update_start(0, 1440).unwrap(), Some(2));
        assert_eq!(starts(&timeline), vec![480, 960, 1440]);
        assert_eq!(timeline.get(2).unwrap().name, "4");

        // occupied target
        assert_eq!(timeline.update_start(0, 960).unwrap(), None);
        assert_eq!(starts(&timeline), vec![480, 960, 1440]);
        assert!(timeline.update_start(3, 0).is_err());
    }

    #[test]
    fn test_update_single_chord_always_moves() {
        let mut timeline = ChordTimeline::new();
        timeline.add(480, "1", 1920);
        assert_eq!(timeline.update_start(0, 480).unwrap(), Some(0));
        assert_eq!(timeline.update_start(0, 0).unwrap(), Some(0));
        assert_eq!(starts(&timeline), vec![0]);
    }

    #[test]
    fn test_remove_selection() {
        let mut timeline = ChordTimeline::from_events(vec![
            ChordEvent::new(960, 961, "5"),
            ChordEvent::new(0, 1920, "1"),
            ChordEvent::new(480, 481, "4"),
        ]);
        assert_eq!(timeline.remove(0).unwrap(), Some(0));
        assert_eq!(timeline.remove(1).unwrap(), Some(0));
        assert_eq!(timeline.remove(0).unwrap(), None);
        assert!(timeline.is_empty());
        assert!(timeline.remove(0).is_err());
    }

    #[test]
    fn test_from_events_drops_same_tick() {
        let timeline = ChordTimeline::from_events(vec![
            ChordEvent::new(480, 481, "4"),
            ChordEvent::new(480, 481, "5"),
        ]);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.get(0).unwrap().name, "4");
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut timeline = ChordTimeline::new();
        timeline.add(0, "1", 1920);
        let json = serde_json::to_string(&timeline).unwrap();
        assert_eq!(json, r#"[{"start":0,"end":1920,"name":"1"}]"#);
    }

    #[test]
    fn test_deserialize_sorts_and_dedups() {
        let json = r#"[
            {"start":960,"end":961,"name":"5"},
            {"start":0,"end":1920,"name":"1"},
            {"start":0,"end":1,"name":"4"}
        ]"#;
        let mut timeline: ChordTimeline = serde_json::from_str(json).unwrap();
        assert_eq!(starts(&timeline), vec![0, 960]);
        assert_eq!(timeline.get(0).unwrap().name, "1");

        assert_eq!(timeline.add(480, "1", 1920), Some(1));
        assert_eq!(starts(&timeline), vec![0, 480, 960]);
    }
}
